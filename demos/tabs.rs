//! # Tabs Example
//!
//! A headless tablist driven through the async runtime:
//! - Building a document with tabs and their panels
//! - Attaching a [`Group`] and routing its commands through a host [`Model`]
//! - Feeding key presses from another task through a [`ProgramHandle`]
//!
//! Logs go to `tabs.log` (filter with `CAIRN_LOG=debug`).
//!
//! Run with: `cargo run --example tabs`

use std::time::Duration;

use cairn::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use cairn::widgets::group::{self, Group, GroupOptions};
use cairn::{Command, Document, Dom, Element, Model, NodeId, Program};

struct Tabs {
    dom: Dom,
    tabs: Group,
    labels: Vec<(NodeId, NodeId)>,
    changes: usize,
}

#[derive(Debug)]
enum Msg {
    Tabs(group::Message),
    Key(KeyCode),
    Quit,
}

impl Model for Tabs {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let mut dom = Dom::new();
        let list = dom.insert(Element::new().role("tablist"));
        let mut labels = Vec::new();
        for name in ["General", "Editor", "Keys", "About"] {
            let panel_id = format!("{}-panel", name.to_lowercase());
            let tab = dom.append(
                list,
                Element::new()
                    .role("tab")
                    .attr("aria-controls", &panel_id)
                    .attr("value", name)
                    .text(name),
            );
            let panel = dom.insert(Element::new().role("tabpanel").id(&panel_id));
            labels.push((tab, panel));
        }
        if let Some(&(first, _)) = labels.first() {
            dom.focus(first);
        }

        let (tabs, cmd) = Group::new(&dom, list, GroupOptions::default());
        let model = Tabs {
            dom,
            tabs,
            labels,
            changes: 0,
        };
        (model, cmd.map(Msg::Tabs))
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Key(code) => {
                let key = KeyEvent::new(code, KeyModifiers::NONE);
                self.tabs
                    .update(&mut self.dom, group::Message::Key(key))
                    .map(Msg::Tabs)
            }
            Msg::Tabs(msg) => {
                if let group::Message::Changed { value, .. } = &msg {
                    self.changes += 1;
                    tracing::info!(value = ?value, "tab selected");
                    println!("selected {}", value.as_deref().unwrap_or("?"));
                }
                self.tabs.update(&mut self.dom, msg).map(Msg::Tabs)
            }
            Msg::Quit => Command::quit(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cairn::logging::init("tabs.log")?;

    let program = Program::<Tabs>::new(());
    let handle = program.handle();
    tokio::spawn(async move {
        // let activation run first
        tokio::time::sleep(Duration::from_millis(150)).await;
        for code in [KeyCode::Right, KeyCode::Right, KeyCode::Left, KeyCode::Left, KeyCode::Left] {
            tracing::debug!(?code, "sending key");
            handle.send(Msg::Key(code));
            tokio::time::sleep(Duration::from_millis(40)).await;
        }
        handle.send(Msg::Quit);
    });

    let model = program.run().await?;
    tracing::info!(changes = model.changes, "program finished");
    println!("{} changes", model.changes);
    for &(tab, panel) in &model.labels {
        println!(
            "{:<8} selected={:<5} panel hidden={}",
            model.dom.text_content(tab),
            model.dom.is_true(tab, "aria-selected"),
            model.dom.is_true(panel, "aria-hidden"),
        );
    }
    Ok(())
}
