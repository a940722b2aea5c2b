use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// `TestProgram` exercises the init/update/view cycle in a plain `#[test]`
/// function, with no tokio runtime or TTY. Immediate messages
/// ([`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages). After-render messages
/// ([`Command::after_render`]) wait for the next render; use
/// [`settle`](TestProgram::settle) to draw and deliver them the way the
/// runtime does. Async and terminal commands are ignored.
///
/// # Example
///
/// ```rust,ignore
/// use forma_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<Form>::new(());
/// prog.send(FormMsg::Fruit(combobox::Message::Focus));
/// prog.settle(60, 20);                             // draw, then reposition
/// assert!(prog.render_string(60, 20).contains("Banana"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    after_render: Vec<M::Message>,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    ///
    /// Commands produced by `init` are queued, not yet processed.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            after_render: Vec::new(),
        };
        program.collect_sync_messages(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    ///
    /// Commands returned by `update` are queued; call
    /// [`drain_messages`](TestProgram::drain_messages) to flush them.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect_sync_messages(cmd);
    }

    /// Process all pending immediate messages.
    ///
    /// Repeats until no update produces another immediate message. After-render
    /// messages stay queued.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect_sync_messages(cmd);
            }
        }
    }

    /// Drain immediate messages, render at the given size, then deliver the
    /// after-render messages. Repeats until both queues are empty.
    ///
    /// Returns the last rendered buffer.
    pub fn settle(&mut self, width: u16, height: u16) -> Buffer {
        loop {
            self.drain_messages();
            let buf = self.render(width, height);
            if self.after_render.is_empty() {
                return buf;
            }
            self.pending_messages.append(&mut self.after_render);
        }
    }

    /// Number of messages waiting for the next render.
    pub fn pending_after_render(&self) -> usize {
        self.after_render.len()
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a ratatui [`Buffer`] of the given dimensions.
    ///
    /// Rendering alone does not release after-render messages; see
    /// [`settle`](TestProgram::settle).
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                self.model.view(frame);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    /// Render the model and return the visible content as a plain string.
    ///
    /// Rows are separated by newlines. Trailing whitespace is preserved.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect_sync_messages(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                self.pending_messages.push(msg);
            }
            CommandInner::Action(Action::AfterRender(msg)) => {
                self.after_render.push(msg);
            }
            CommandInner::Action(Action::Quit) => {}
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect_sync_messages(cmd);
                }
            }
            // Async commands can't be executed synchronously in tests
            CommandInner::Future(_) => {}
            CommandInner::Terminal(_) => {}
        }
    }
}

/// Flatten a buffer into newline-separated rows of cell symbols.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area: Rect = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;
    use std::cell::Cell;

    struct Counter {
        count: i64,
    }

    #[derive(Debug)]
    enum CounterMsg {
        Increment,
        Decrement,
        Reset,
    }

    impl Model for Counter {
        type Message = CounterMsg;
        type Flags = i64;

        fn init(initial: i64) -> (Self, Command<CounterMsg>) {
            (Counter { count: initial }, Command::none())
        }

        fn update(&mut self, msg: CounterMsg) -> Command<CounterMsg> {
            match msg {
                CounterMsg::Increment => self.count += 1,
                CounterMsg::Decrement => self.count -= 1,
                CounterMsg::Reset => self.count = 0,
            }
            Command::none()
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = format!("Count: {}", self.count);
            frame.render_widget(Paragraph::new(text), frame.area());
        }
    }

    #[test]
    fn test_program_init_with_flags() {
        let prog = TestProgram::<Counter>::new(42);
        assert_eq!(prog.model().count, 42);
    }

    #[test]
    fn test_program_send_multiple() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Increment);
        prog.send(CounterMsg::Increment);
        prog.send(CounterMsg::Increment);
        prog.send(CounterMsg::Decrement);
        assert_eq!(prog.model().count, 2);
        prog.send(CounterMsg::Reset);
        assert_eq!(prog.model().count, 0);
    }

    #[test]
    fn test_program_render_after_update() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(CounterMsg::Decrement);
        let content = prog.render_string(40, 1);
        assert!(content.contains("Count: -1"));
    }

    struct ChainModel {
        steps: Vec<String>,
    }

    #[derive(Debug)]
    enum ChainMsg {
        Start,
        Step(String),
    }

    impl Model for ChainModel {
        type Message = ChainMsg;
        type Flags = ();

        fn init(_: ()) -> (Self, Command<ChainMsg>) {
            (ChainModel { steps: vec![] }, Command::none())
        }

        fn update(&mut self, msg: ChainMsg) -> Command<ChainMsg> {
            match msg {
                ChainMsg::Start => {
                    self.steps.push("started".into());
                    Command::message(ChainMsg::Step("auto".into()))
                }
                ChainMsg::Step(s) => {
                    self.steps.push(s);
                    Command::none()
                }
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            frame.render_widget(Paragraph::new(self.steps.join(", ")), frame.area());
        }
    }

    #[test]
    fn test_command_message_chaining() {
        let mut prog = TestProgram::<ChainModel>::new(());
        prog.send(ChainMsg::Start);
        assert_eq!(prog.model().steps, vec!["started"]);
        prog.drain_messages();
        assert_eq!(prog.model().steps, vec!["started", "auto"]);
    }

    // Records the width it was drawn at and asks to be told after the draw.
    struct Measured {
        drawn_width: Cell<u16>,
        seen_width: Option<u16>,
    }

    enum MeasuredMsg {
        Open,
        Measure,
    }

    impl Model for Measured {
        type Message = MeasuredMsg;
        type Flags = ();

        fn init(_: ()) -> (Self, Command<MeasuredMsg>) {
            let model = Measured {
                drawn_width: Cell::new(0),
                seen_width: None,
            };
            (model, Command::none())
        }

        fn update(&mut self, msg: MeasuredMsg) -> Command<MeasuredMsg> {
            match msg {
                MeasuredMsg::Open => Command::after_render(MeasuredMsg::Measure),
                MeasuredMsg::Measure => {
                    self.seen_width = Some(self.drawn_width.get());
                    Command::none()
                }
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            self.drawn_width.set(frame.area().width);
        }
    }

    #[test]
    fn after_render_waits_for_a_draw() {
        let mut prog = TestProgram::<Measured>::new(());
        prog.send(MeasuredMsg::Open);
        prog.drain_messages();
        assert_eq!(prog.model().seen_width, None);
        assert_eq!(prog.pending_after_render(), 1);

        prog.settle(33, 4);
        assert_eq!(prog.model().seen_width, Some(33));
        assert_eq!(prog.pending_after_render(), 0);
    }
}
