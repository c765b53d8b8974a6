//! Built-in bot commands: on-demand status lookups, no change detection.

mod status;

#[cfg(test)]
mod tests;

pub use status::{HelpCommand, PlayerLookup, PlayersCommand, ServersCommand, TellOffCommand};

use async_trait::async_trait;
use std::sync::Arc;

/// What a handler gets to see about the invoking message.
pub struct CommandContext<'a> {
    /// Text after the command word, trimmed.
    pub args: &'a str,
}

/// A named bot command. Handlers hold whatever sources they need.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// One-line description for `/help` and the Telegram command menu.
    fn description(&self) -> &str;

    /// Produce the reply text.
    async fn handle(&self, ctx: &CommandContext<'_>) -> String;
}

/// Routes `/name` messages to registered handlers.
#[derive(Default)]
pub struct CommandRouter {
    handlers: Vec<(String, Arc<dyn CommandHandler>)>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name` (without the leading `/`). Re-registering replaces.
    pub fn register(&mut self, name: &str, handler: Arc<dyn CommandHandler>) {
        let name = name.trim_start_matches('/').to_string();
        match self.handlers.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = handler,
            None => self.handlers.push((name, handler)),
        }
    }

    /// `(name, description)` for every registered command, in registration order.
    pub fn menu(&self) -> Vec<(String, String)> {
        self.handlers
            .iter()
            .map(|(name, h)| (name.clone(), h.description().to_string()))
            .collect()
    }

    /// Split `/cmd@botname args` into `("cmd", "args")`. `None` for non-commands.
    pub fn parse(text: &str) -> Option<(&str, &str)> {
        let text = text.trim_start();
        let rest = text.strip_prefix('/')?;
        let (first, args) = match rest.find(char::is_whitespace) {
            Some(i) => (&rest[..i], rest[i..].trim()),
            None => (rest, ""),
        };
        // Strip @botname suffix (e.g. "/status@playwatch_bot" → "status").
        let name = first.split('@').next().unwrap_or(first);
        if name.is_empty() {
            return None;
        }
        Some((name, args))
    }

    /// Run the handler for `text`, if it names a registered command.
    pub async fn dispatch(&self, text: &str) -> Option<String> {
        let (name, args) = Self::parse(text)?;
        let (_, handler) = self.handlers.iter().find(|(n, _)| n == name)?;
        let ctx = CommandContext { args };
        Some(handler.handle(&ctx).await)
    }
}

/// The standard command set. `players`/`servers` are only registered when tracked.
pub fn build_router(
    players: Option<Arc<dyn PlayerLookup>>,
    servers: Option<ServersCommand>,
) -> CommandRouter {
    let mut router = CommandRouter::new();
    if let Some(lookup) = players {
        router.register("status", Arc::new(PlayersCommand::new(lookup)));
    }
    if let Some(servers) = servers {
        router.register("servers", Arc::new(servers));
    }
    router.register("tell_off", Arc::new(TellOffCommand));
    let mut menu = router.menu();
    menu.push(("help".to_string(), HelpCommand::DESCRIPTION.to_string()));
    router.register("help", Arc::new(HelpCommand::new(menu)));
    router
}
