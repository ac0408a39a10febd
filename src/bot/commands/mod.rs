pub mod fun;
pub mod reminders;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Meow Bot commands:")]
pub enum Command {
    #[command(description = "Display the help message")]
    Start,
    #[command(description = "Display the help message")]
    Help,
    #[command(description = "Make a cat noise")]
    Meow,
    #[command(description = "Say hi")]
    Greet,
    #[command(description = "Roll a percentage, one per argument")]
    Chance(String),
    #[command(description = "Tell your fortune, one per argument")]
    Fortune(String),
    #[command(description = "Pick one of the arguments")]
    Pick(String),
    #[command(description = "Roll a dice")]
    Dice,
    #[command(description = "Daily reminders: get | add HH:MM | remove HH:MM | clear")]
    Reminder(String),
}

/// Splits the raw command remainder into whitespace separated arguments.
pub fn split_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args() {
        assert!(split_args("").is_empty());
        assert!(split_args("   ").is_empty());
        assert_eq!(split_args(" a  b\tc "), vec!["a", "b", "c"]);
    }
}
