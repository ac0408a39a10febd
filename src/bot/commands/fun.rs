use teloxide::prelude::*;

use crate::services::random::RandomReplies;
use crate::utils::feedback::CommandFeedback;

pub async fn handle_help(bot: Bot, msg: Message, replies: &RandomReplies) -> ResponseResult<()> {
    CommandFeedback::new(bot, &msg).reply(replies.help.as_str()).await?;
    Ok(())
}

/// Not quoted: the cat just talks into the chat.
pub async fn handle_meow(bot: Bot, msg: Message, replies: &RandomReplies) -> ResponseResult<()> {
    CommandFeedback::new(bot, &msg).send(replies.meow()).await?;
    Ok(())
}

pub async fn handle_greet(bot: Bot, msg: Message) -> ResponseResult<()> {
    let text = greeting(msg.from().map(|user| user.full_name()).as_deref());
    CommandFeedback::new(bot, &msg).reply(text).await?;
    Ok(())
}

pub fn greeting(full_name: Option<&str>) -> String {
    match full_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("Hi {name}"),
        None => "Hi there".to_string(),
    }
}

pub async fn handle_chance(bot: Bot, msg: Message, args: &[String], replies: &RandomReplies) -> ResponseResult<()> {
    let text = replies.chance(args);
    CommandFeedback::new(bot, &msg).reply(text).await?;
    Ok(())
}

pub async fn handle_fortune(bot: Bot, msg: Message, args: &[String], replies: &RandomReplies) -> ResponseResult<()> {
    let text = replies.fortune(args);
    CommandFeedback::new(bot, &msg).reply(text).await?;
    Ok(())
}

pub async fn handle_pick(bot: Bot, msg: Message, args: &[String], replies: &RandomReplies) -> ResponseResult<()> {
    let text = replies.pick(args);
    CommandFeedback::new(bot, &msg).reply(text).await?;
    Ok(())
}

pub async fn handle_dice(bot: Bot, msg: Message) -> ResponseResult<()> {
    CommandFeedback::new(bot, &msg).dice().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        assert_eq!(greeting(Some("Ada Lovelace")), "Hi Ada Lovelace");
        assert_eq!(greeting(Some("  ")), "Hi there");
        assert_eq!(greeting(None), "Hi there");
    }
}
