/// Represents a bot command as advertised to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
}

/// The commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Group,
    Call,
    List,
}

/// Every command, in the order `/help` lists them
pub static COMMANDS: [Command; 4] = [
    Command {
        name: "help",
        description: "Show this help message",
        kind: CommandKind::Help,
    },
    Command {
        name: "g",
        description: "Add/remove a user. Usage: /g [+/-] @username",
        kind: CommandKind::Group,
    },
    Command {
        name: "call",
        description: "Mention all users in the group",
        kind: CommandKind::Call,
    },
    Command {
        name: "list",
        description: "Show all users in the mention group",
        kind: CommandKind::List,
    },
];

impl Command {
    /// Names match exactly; `/LIST` is not `/list`
    pub fn matches(&self, input: &str) -> bool {
        self.name == input
    }

    /// Look up a command by name
    pub fn find(input: &str) -> Option<&'static Command> {
        COMMANDS.iter().find(|c| c.matches(input))
    }
}
