//! # Menu Button Example
//!
//! A button that opens a menu in an anchored popup:
//! - Wiring a [`Popup`] and a menu [`Group`] into one host [`Model`]
//! - Forwarding layout observer records so the popup follows its anchor
//! - Rendering the resolved position with [`overlay::render_popup`]
//!
//! The script opens the menu, moves to the last item and activates it with
//! Enter, which closes the popup and returns focus to the button. Each
//! frame is drawn to an in-memory terminal and printed.
//!
//! Run with: `cargo run --example menu_button`

use std::time::Duration;

use cairn::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use cairn::ratatui::backend::TestBackend;
use cairn::ratatui::layout::{Rect, Size};
use cairn::ratatui::widgets::{Block, Paragraph};
use cairn::ratatui::Terminal;
use cairn::widgets::geometry::{Placement, PopupStyle};
use cairn::widgets::group::{self, Group, GroupOptions};
use cairn::widgets::overlay;
use cairn::widgets::popup::{self, Popup, PopupOptions};
use cairn::{Click, Command, Document, Dom, Element, Model, NodeId, ObserverSet, Program};

const VIEWPORT: Rect = Rect::new(0, 0, 40, 12);
const ITEMS: [&str; 3] = ["Open", "Save", "Quit"];

struct MenuButton {
    dom: Dom,
    observers: ObserverSet,
    popup: Popup,
    menu: Group,
    button: NodeId,
    items: Vec<NodeId>,
    style: Option<PopupStyle>,
    chosen: Option<String>,
}

#[derive(Debug)]
enum Msg {
    ClickButton,
    Key(KeyCode),
    Click(Click),
    Layout,
    Popup(popup::Message),
    Menu(group::Message),
    Quit,
}

impl Model for MenuButton {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let mut dom = Dom::with_viewport(VIEWPORT);
        let root = dom.insert(Element::new());
        let button = dom.append(
            root,
            Element::new().role("button").text("File").rect(Rect::new(2, 1, 8, 1)),
        );
        let dialog = dom.append(root, Element::new().role("dialog"));
        let body = dom.append(
            dialog,
            Element::new()
                .class("content")
                .rect(Rect::new(0, 0, 12, ITEMS.len() as u16 + 2)),
        );
        let list = dom.append(body, Element::new().role("menu"));
        let items = ITEMS
            .iter()
            .map(|&name| {
                dom.append(
                    list,
                    Element::new().role("menuitem").attr("value", name).text(name),
                )
            })
            .collect();

        let mut observers = ObserverSet::new();
        let (popup, popup_cmd) = Popup::new(
            &mut dom,
            &mut observers,
            button,
            dialog,
            Placement::BottomLeft,
            None,
            PopupOptions::default(),
        );
        let (menu, menu_cmd) = Group::new(&dom, list, GroupOptions::default());
        let model = MenuButton {
            dom,
            observers,
            popup,
            menu,
            button,
            items,
            style: None,
            chosen: None,
        };
        let cmd = Command::batch([
            popup_cmd.map(Msg::Popup),
            menu_cmd.map(Msg::Menu),
            Command::message(Msg::Layout),
        ]);
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::ClickButton => Command::message(Msg::Click(Click::primary(self.button))),
            Msg::Key(code) => {
                let key = KeyEvent::new(code, KeyModifiers::NONE);
                let menu = self.menu.update(&mut self.dom, group::Message::Key(key));
                let popup = self.popup.update(&mut self.dom, popup::Message::Key(key));
                Command::batch([menu.map(Msg::Menu), popup.map(Msg::Popup)])
            }
            Msg::Click(click) => {
                let menu = self.menu.update(&mut self.dom, group::Message::Click(click));
                let popup = self.popup.update(&mut self.dom, popup::Message::Click(click));
                Command::batch([menu.map(Msg::Menu), popup.map(Msg::Popup)])
            }
            Msg::Layout => {
                let records = self.observers.collect(&self.dom);
                Command::batch(records.into_iter().map(|record| {
                    self.popup
                        .update(&mut self.dom, popup::Message::Observed(record))
                        .map(Msg::Popup)
                }))
            }
            Msg::Menu(group::Message::Click(click)) => Command::message(Msg::Click(click)),
            Msg::Menu(msg) => {
                if let group::Message::Changed { value, .. } = &msg {
                    tracing::info!(value = ?value, "menu item chosen");
                    self.chosen.clone_from(value);
                }
                self.menu.update(&mut self.dom, msg).map(Msg::Menu)
            }
            Msg::Popup(msg) => {
                match &msg {
                    popup::Message::Opened => {
                        // land on the first item, as a menu button does
                        if let Some(&first) = self.items.first() {
                            self.dom.focus(first);
                        }
                    }
                    popup::Message::StyleChanged(style) => {
                        tracing::debug!(?style, "popup moved");
                        self.style = Some(*style);
                        self.draw();
                    }
                    popup::Message::Closed => {
                        self.style = None;
                        self.draw();
                    }
                    _ => {}
                }
                self.popup.update(&mut self.dom, msg).map(Msg::Popup)
            }
            Msg::Quit => Command::quit(),
        }
    }
}

impl MenuButton {
    fn draw(&self) {
        let Ok(mut terminal) = Terminal::new(TestBackend::new(VIEWPORT.width, VIEWPORT.height))
        else {
            return;
        };
        let drawn = terminal.draw(|frame| {
            let button = self.dom.rect(self.button);
            frame.render_widget(Paragraph::new("[ File ]"), button);
            let Some(style) = &self.style else {
                return;
            };
            let body = self
                .dom
                .descendants(self.popup.content())
                .first()
                .copied()
                .unwrap_or(self.popup.content());
            let content = self.dom.rect(body);
            let inner = overlay::render_popup(
                frame,
                style,
                Size::new(content.width, content.height),
                Some(&Block::bordered()),
            );
            let lines: Vec<String> = self
                .items
                .iter()
                .map(|&item| {
                    let marker = if self.dom.focused() == Some(item) { '>' } else { ' ' };
                    format!("{marker}{}", self.dom.text_content(item))
                })
                .collect();
            frame.render_widget(Paragraph::new(lines.join("\n")), inner);
        });
        if drawn.is_ok() {
            println!("{}", render_buffer(terminal.backend()));
        }
    }
}

fn render_buffer(backend: &TestBackend) -> String {
    let buffer = backend.buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cairn::logging::init("menu_button.log")?;

    let program = Program::<MenuButton>::new(());
    let handle = program.handle();
    tokio::spawn(async move {
        let pause = || tokio::time::sleep(Duration::from_millis(150));
        pause().await;
        handle.send(Msg::ClickButton);
        pause().await;
        handle.send(Msg::Key(KeyCode::Down));
        pause().await;
        handle.send(Msg::Key(KeyCode::Down));
        pause().await;
        handle.send(Msg::Key(KeyCode::Enter));
        pause().await;
        handle.send(Msg::Quit);
    });

    let model = program.run().await?;
    tracing::info!(chosen = ?model.chosen, "program finished");
    println!(
        "chose {:?}, focus back on the button: {}",
        model.chosen,
        model.dom.focused() == Some(model.button)
    );
    Ok(())
}
