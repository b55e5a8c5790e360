use crate::command::Command;

/// The host application trait, following the [Elm Architecture].
///
/// A cairn host owns the [`Dom`](crate::dom::Dom), the controllers attached
/// to it and the routing between them. The runtime drives it:
///
/// 1. [`init`](Model::init) creates the initial state and may return a
///    [`Command`], typically the deferred activation of a group.
/// 2. Input events and expired deferred tasks arrive as messages.
/// 3. [`update`](Model::update) processes each message, forwards it to the
///    right controller, and returns the controller's [`Command`] mapped into
///    the host's message type.
/// 4. Step 3 repeats until the program exits.
///
/// # Example
///
/// ```rust,ignore
/// use cairn_core::{Command, Dom, Model};
/// use cairn_widgets::group::{self, Group};
///
/// struct App { dom: Dom, tabs: Group }
///
/// enum Msg { Tabs(group::Message) }
///
/// impl Model for App {
///     type Message = Msg;
///     type Flags = (Dom, NodeId);
///
///     fn init((mut dom, tablist): (Dom, NodeId)) -> (Self, Command<Msg>) {
///         let (tabs, cmd) = Group::new(&mut dom, tablist, Default::default());
///         (App { dom, tabs }, cmd.map(Msg::Tabs))
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Tabs(m) => self.tabs.update(&mut self.dom, m).map(Msg::Tabs),
///         }
///     }
/// }
/// ```
///
/// [Elm Architecture]: https://guide.elm-lang.org/architecture/
pub trait Model: Sized + Send + 'static {
    /// The host's message type.
    ///
    /// Usually one variant per controller, wrapping that controller's own
    /// message type, plus whatever input the host receives directly.
    type Message: Send + 'static;

    /// Initialization data passed to [`Model::init`].
    ///
    /// Use `()` when no startup data is needed.
    type Flags: Send + 'static;

    /// Create the initial model state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message, mutate state, and return a command for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;
}
