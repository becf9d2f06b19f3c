use std::path::PathBuf;

use reify::{Both, Each, TraversalExt};
use reify_visualize::visualize::*;

fn main() -> std::io::Result<()> {
    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pairs.html"));

    let pairs = Each.compose::<i32, String, _>(Both);
    let source = vec![(1, 2), (3, 4), (5, 6)];

    let (reified, collected) = pairs.reify_v(source);
    let replacements: Vec<String> = reified
        .holes()
        .iter()
        .rev()
        .map(|x| format!("#{}", x))
        .collect();
    let (rebuilt, replayed) = reified.rebuild_v(replacements);
    println!("rebuilt: {:?}", rebuilt);

    collected
        .label(
            "Reify".to_string(),
            "collect every number in a list of pairs".to_string(),
        )
        .fuse(
            replayed,
            "Rebuild".to_string(),
            "replay with the holes reversed, as strings".to_string(),
        )
        .finish(out)
}
