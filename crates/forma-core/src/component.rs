use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable widget that owns its state and renders into a given [`Rect`].
///
/// `Component` mirrors [`Model`](crate::Model) but its [`view`](Component::view)
/// receives the area the parent assigned to it, so widgets compose inside
/// layouts. A form field is a component; the form that arranges the fields is
/// the model.
///
/// # Composition pattern
///
/// Wrap the component's message in a variant of the parent message and lift
/// commands and subscriptions with `map`:
///
/// ```rust,ignore
/// use forma_core::{Command, Component, Model, Subscription};
/// use forma_widgets::combobox::{self, Combobox};
///
/// struct Form { fruit: Combobox }
///
/// enum Msg { Fruit(combobox::Message) }
///
/// impl Model for Form {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<Msg>) {
///         let (fruit, cmd) = Combobox::new(Default::default());
///         (Form { fruit }, cmd.map(Msg::Fruit))
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Fruit(m) => self.fruit.update(m).map(Msg::Fruit),
///         }
///     }
///
///     fn view(&self, frame: &mut ratatui::Frame) {
///         self.fruit.view(frame, frame.area());
///     }
///
///     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///         self.fruit
///             .subscriptions()
///             .into_iter()
///             .map(|s| s.map(Msg::Fruit))
///             .collect()
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    ///
    /// The returned command uses the component's own `Message` type; the parent
    /// lifts it with [`Command::map`].
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into a specific `area` of the [`Frame`].
    ///
    /// Floating parts (menus, popovers) may draw outside `area` but must stay
    /// inside `frame.area()`.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Declare the listeners and timers this component needs right now.
    ///
    /// The runtime diffs the returned set after every update, so a component
    /// releases a listener simply by no longer returning it.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently has keyboard focus.
    fn focused(&self) -> bool {
        false
    }
}
