use std::{fmt::Debug, io, path::PathBuf};

use reify::{reify, ReifyError, Reified, Traversal};
use serde::Serialize;
use tracing::info;

/// Extension methods that run reification and rebuild while recording what happened.
pub trait TraversalVizExt<A, B, S, T>: Traversal<A, B, S, T> + Sized
where
    A: Debug,
    S: Debug,
{
    fn reify_v<'r>(&'r self, source: S) -> (Reified<'r, A, B, S, T>, Viz)
    where
        A: 'r,
        B: Clone + 'r,
        S: Clone + 'r,
        T: 'r;
}

pub trait ReifiedVizExt<B, T>
where
    B: Debug,
    T: Debug,
{
    fn rebuild_v(&self, replacements: Vec<B>) -> (Result<T, ReifyError>, Viz);
}

pub trait VizOut {
    type Config;

    fn label(self, info_header: String, info_txt: String) -> Self;

    fn fuse(self, next: Self, info_header: String, info_txt: String) -> Self;

    fn finish(self, cfg: Self::Config) -> io::Result<()>;
}

impl<Tr, A, B, S, T> TraversalVizExt<A, B, S, T> for Tr
where
    Tr: Traversal<A, B, S, T>,
    A: Debug,
    S: Debug,
{
    fn reify_v<'r>(&'r self, source: S) -> (Reified<'r, A, B, S, T>, Viz)
    where
        A: 'r,
        B: Clone + 'r,
        S: Clone + 'r,
        T: 'r,
    {
        let source_txt = format!("{:?}", source);
        let reified = reify(self, source);

        let mut actions: Vec<VizAction> = reified
            .holes()
            .iter()
            .enumerate()
            .map(|(slot, hole)| VizAction::Focus {
                slot,
                txt: format!("{:?}", hole),
            })
            .collect();
        actions.push(VizAction::InfoCard {
            info_header: "Reified".to_string(),
            info_txt: format!("{} holes, plan {:?}", reified.holes().len(), reified.plan()),
        });

        (
            reified,
            Viz {
                source_txt,
                actions,
            },
        )
    }
}

impl<'r, A, B, S, T> ReifiedVizExt<B, T> for Reified<'r, A, B, S, T>
where
    B: Debug,
    S: Debug,
    T: Debug,
{
    fn rebuild_v(&self, replacements: Vec<B>) -> (Result<T, ReifyError>, Viz) {
        let mut actions = Vec::new();

        // a wrong-sized list fills nothing; the rebuild reports it
        if replacements.len() == self.plan().len() {
            for (slot, &index) in self.plan().iter().enumerate() {
                if let Some(replacement) = replacements.get(index) {
                    actions.push(VizAction::Fill {
                        slot,
                        index,
                        txt: format!("{:?}", replacement),
                    });
                }
            }
        }

        let res = self.rebuild(replacements);
        actions.push(match &res {
            Ok(out) => VizAction::InfoCard {
                info_header: "Rebuilt".to_string(),
                info_txt: format!("result: {:?}", out),
            },
            Err(e) => VizAction::InfoCard {
                info_header: "Error during rebuild!".to_string(),
                info_txt: format!("error: {}", e),
            },
        });

        (
            res,
            Viz {
                source_txt: format!("{:?}", self.source()),
                actions,
            },
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "typ", rename_all = "snake_case")]
pub enum VizAction {
    // a focus recorded while collecting
    Focus { slot: usize, txt: String },
    // a slot filled from a replacement during replay
    Fill {
        slot: usize,
        index: usize,
        txt: String,
    },
    // info text display!
    InfoCard {
        info_header: String,
        info_txt: String,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Viz {
    source_txt: String,
    actions: Vec<VizAction>,
}

impl Viz {
    pub fn actions(&self) -> &[VizAction] {
        &self.actions
    }
}

impl VizOut for Viz {
    type Config = PathBuf;

    fn label(mut self, info_header: String, info_txt: String) -> Self {
        self.actions.insert(
            0,
            VizAction::InfoCard {
                info_header,
                info_txt,
            },
        );
        self
    }

    fn fuse(self, next: Self, info_header: String, info_txt: String) -> Self {
        let mut actions = self.actions;
        actions.push(VizAction::InfoCard {
            info_header,
            info_txt,
        });
        actions.extend(next.actions);

        Self {
            source_txt: self.source_txt,
            actions,
        }
    }

    fn finish(self, cfg: Self::Config) -> io::Result<()> {
        let to_write = serialize_html(&self)?;
        info!(path = %cfg.display(), "writing visualization");
        std::fs::write(cfg, to_write)
    }
}

pub fn serialize_json(v: &Viz) -> serde_json::Result<String> {
    serde_json::to_string(v)
}

pub fn serialize_html(v: &Viz) -> serde_json::Result<String> {
    let mut out = String::new();
    out.push_str(TEMPLATE_BEFORE);
    out.push_str(&serialize_json(v)?);
    out.push_str(TEMPLATE_AFTER);

    Ok(out)
}

static TEMPLATE_BEFORE: &str = r###"
<!DOCTYPE html>
<meta charset="UTF-8">
<style>

body {
  background-color: lightcyan;
  font-family: verdana;
}

.row {
  display: flex;
  gap: 10px;
  margin: 20px;
  min-height: 40px;
}

.slot {
  background-color: white;
  border: 4px solid steelblue;
  border-radius: 4px;
  padding: 8px 14px;
  font-size: 16px;
}

.slot.filled {
  border-color: mediumVioletRed;
}

.infocard {
  background-color: white;
  border-style: solid;
  width: 500px;
  padding: 10px;
  margin: 20px;
  border-radius: 10px;
}

.infocard .cardheader {
  font-size: 25px;
  padding-bottom: 5px;
  border-bottom: solid;
  border-width: 5px;
}

.infocard .cardbody {
  font-size: 15px;
  padding: 10px;
  font-family: "Lucida Console", "Courier New", monospace;
  background-color: steelblue;
  color: white;
}

</style>

<body>

<div id="titlecard" class="infocard">
  <div class="cardheader">source</div>
  <div class="cardbody"></div>
</div>

<div id="holes" class="row"></div>

<script src="https://d3js.org/d3.v7.js"></script>
<script>

const data = "###;

static TEMPLATE_AFTER: &str = r###";

d3.select("#titlecard .cardbody").text(data.source_txt);

var actions = data.actions;

let intervalId = setInterval(function () {
  var next = actions.shift();
  if (!next) {
    clearInterval(intervalId);
    return;
  }

  if (next.typ == "info_card") {
    d3.select("#titlecard .cardheader").text(next.info_header);
    d3.select("#titlecard .cardbody").text(next.info_txt);

    d3.select("#titlecard")
      .transition().duration(500)
      .style("border-color", "mediumvioletred")
      .transition().duration(1000)
      .style("border-color", "black");
  } else if (next.typ == "focus") {
    d3.select("#holes").append("div")
      .attr("class", "slot")
      .attr("id", "slot-" + next.slot)
      .text(next.txt);
  } else if (next.typ == "fill") {
    let target = d3.select("#slot-" + next.slot);
    if (target.empty()) {
      target = d3.select("#holes").append("div")
        .attr("class", "slot")
        .attr("id", "slot-" + next.slot);
    }
    target.classed("filled", true)
      .text(next.txt + " (#" + next.index + ")");
  }
}, 600);

</script>
</body>

"###;
