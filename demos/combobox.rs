//! # Combobox Example
//!
//! A two-field form built from searchable comboboxes:
//! - Routing keys to the focused field and moving focus with Tab
//! - Reacting to `Changed` and `ConfigurationFailed` from the children
//! - Configuring a field from JSON properties
//! - Logging to a file through `tracing`
//!
//! Run with: `cargo run --example combobox -- [props.json]`
//!
//! The optional JSON file holds an object of properties for the first field,
//! for example `{"label": "Fruit", "requiredIcon": true, "items": [...]}`.
//! Set `FORMA_LOG=debug` to see the widget's state transitions in
//! `combobox.log`.

use forma::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use forma::ratatui::layout::{Constraint, Layout, Rect};
use forma::ratatui::style::{Color, Modifier, Style};
use forma::ratatui::text::{Line, Span};
use forma::ratatui::widgets::Paragraph;
use forma::ratatui::Frame;
use forma::widgets::combobox::{self, Combobox, ComboboxProps, Item};
use forma::widgets::key::KeyMap;
use forma::{terminal_events, Command, Component, Model, Subscription, TerminalEvent};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const FIELD_HEIGHT: u16 = 5;

struct Form {
    fruit: Combobox,
    country: Combobox,
    focus: Field,
    status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Fruit,
    Country,
}

#[derive(Debug)]
enum Msg {
    Fruit(combobox::Message),
    Country(combobox::Message),
    Key(KeyEvent),
    Paste(String),
    Quit,
}

impl Form {
    fn focused_mut(&mut self) -> &mut Combobox {
        match self.focus {
            Field::Fruit => &mut self.fruit,
            Field::Country => &mut self.country,
        }
    }

    fn to_focused(&mut self, msg: combobox::Message) -> Command<Msg> {
        match self.focus {
            Field::Fruit => self.fruit.update(msg).map(Msg::Fruit),
            Field::Country => self.country.update(msg).map(Msg::Country),
        }
    }

    fn move_focus(&mut self, to: Field) -> Command<Msg> {
        if self.focus == to {
            return self.to_focused(combobox::Message::Focus);
        }
        let blurred = self.to_focused(combobox::Message::Blur);
        self.focus = to;
        let focused = self.to_focused(combobox::Message::Focus);
        Command::batch([blurred, focused])
    }

    fn child(&mut self, field: Field, msg: combobox::Message) -> Command<Msg> {
        match msg {
            combobox::Message::Changed(change) => {
                self.status = format!(
                    "{field:?} changed: {:?} -> {:?}",
                    change.old_value, change.value
                );
                Command::none()
            }
            combobox::Message::ConfigurationFailed(err) => {
                self.status = format!("{field:?} rejected a property: {err}");
                Command::none()
            }
            combobox::Message::FocusRequested => self.move_focus(field),
            msg => match field {
                Field::Fruit => self.fruit.update(msg).map(Msg::Fruit),
                Field::Country => self.country.update(msg).map(Msg::Country),
            },
        }
    }
}

impl Model for Form {
    type Message = Msg;
    type Flags = Vec<(String, serde_json::Value)>;

    fn init(properties: Self::Flags) -> (Self, Command<Msg>) {
        let (mut fruit, fruit_cmd) = Combobox::new(ComboboxProps {
            label: "Fruit".into(),
            items: ["Apple", "Banana", "Cherry", "Durian", "Elderberry", "Fig", "Grape", "Kiwi", "Lemon", "Mango"]
                .iter()
                .enumerate()
                .map(|(i, name)| Item::labeled((i + 1).to_string(), *name))
                .collect(),
            value: "1".into(),
            ..ComboboxProps::default()
        });
        let (country, country_cmd) = Combobox::new(ComboboxProps {
            label: "Country".into(),
            items: vec![
                Item::labeled("fi", "Finland"),
                Item::labeled("fr", "France"),
                Item::labeled("de", "Germany"),
                Item::labeled("jp", "Japan"),
                Item::labeled("nz", "New Zealand"),
            ],
            required_icon: true,
            error: "Choose a delivery country".into(),
            ..ComboboxProps::default()
        });

        let configured: Vec<_> = properties
            .into_iter()
            .map(|(name, value)| {
                fruit
                    .update(combobox::Message::SetProperty { name, value })
                    .map(Msg::Fruit)
            })
            .collect();
        let focused = fruit.update(combobox::Message::Focus).map(Msg::Fruit);

        let form = Form {
            fruit,
            country,
            focus: Field::Fruit,
            status: String::new(),
        };
        let cmd = Command::batch(
            [fruit_cmd.map(Msg::Fruit), country_cmd.map(Msg::Country), focused]
                .into_iter()
                .chain(configured),
        );
        (form, cmd)
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Fruit(m) => self.child(Field::Fruit, m),
            Msg::Country(m) => self.child(Field::Country, m),
            Msg::Key(key) => match key.code {
                KeyCode::Tab | KeyCode::BackTab => {
                    let closed = self.to_focused(combobox::Message::KeyPress(key));
                    let next = match self.focus {
                        Field::Fruit => Field::Country,
                        Field::Country => Field::Fruit,
                    };
                    Command::batch([closed, self.move_focus(next)])
                }
                _ => self.to_focused(combobox::Message::KeyPress(key)),
            },
            Msg::Paste(text) => self.to_focused(combobox::Message::Paste(text)),
            Msg::Quit => {
                self.focused_mut().update(combobox::Message::Blur);
                Command::quit()
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [title_area, form_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(FIELD_HEIGHT * 2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new("Order form").style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            title_area,
        );

        let [fruit_area, country_area] =
            Layout::vertical([Constraint::Length(FIELD_HEIGHT); 2]).areas(form_area);

        // The focused field draws last so its menu covers the other field.
        match self.focus {
            Field::Fruit => {
                self.country.view(frame, country_area);
                self.fruit.view(frame, fruit_area);
            }
            Field::Country => {
                self.fruit.view(frame, fruit_area);
                self.country.view(frame, country_area);
            }
        }

        frame.render_widget(
            Paragraph::new(self.status.as_str()).style(Style::default().fg(Color::Green)),
            Rect { height: 1, ..status_area },
        );

        let focused = match self.focus {
            Field::Fruit => &self.fruit,
            Field::Country => &self.country,
        };
        let dim = Style::default().fg(Color::DarkGray);
        let mut hints: Vec<Span> = focused
            .key_bindings()
            .short_help()
            .into_iter()
            .flat_map(|binding| [Span::styled(binding.hint(), dim), Span::raw("  ")])
            .collect();
        hints.push(Span::styled("tab next field  ctrl+c quit", dim));
        frame.render_widget(Paragraph::new(Line::from(hints)), help_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|event| match event {
            TerminalEvent::Key(key) if key.kind == KeyEventKind::Release => None,
            TerminalEvent::Key(key)
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Some(Msg::Quit)
            }
            TerminalEvent::Key(key) => Some(Msg::Key(key)),
            TerminalEvent::Paste(text) => Some(Msg::Paste(text)),
            _ => None,
        })];
        subs.extend(self.fruit.subscriptions().into_iter().map(|s| s.map(Msg::Fruit)));
        subs.extend(self.country.subscriptions().into_iter().map(|s| s.map(Msg::Country)));
        subs
    }
}

fn read_properties(path: &str) -> Result<Vec<(String, serde_json::Value)>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    match serde_json::from_str(&text)? {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(format!("{path}: expected a JSON object of properties").into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log = forma::log_to_file("combobox.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("FORMA_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    let properties = match std::env::args().nth(1) {
        Some(path) => read_properties(&path)?,
        None => Vec::new(),
    };

    let form = forma::run::<Form>(properties).await?;
    tracing::info!(fruit = form.fruit.value(), country = form.country.value(), "form closed");
    println!("fruit={} country={}", form.fruit.value(), form.country.value());
    Ok(())
}
