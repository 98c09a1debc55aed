#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,              // /help
    Copy,              // /copy — clipboard export of the last result
    Clear,             // /clear — reset both inputs, hide results
    Explain,           // /explain — feature breakdown for the claim tab
    Health,            // /health — re-probe the API
    Quit,              // /quit or /exit
    Unknown(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    let verb = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default();

    match verb {
        "/help" => Command::Help,
        "/copy" => Command::Copy,
        "/clear" => Command::Clear,
        "/explain" => Command::Explain,
        "/health" => Command::Health,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_parse() {
        assert_eq!(parse_command("/help"), Command::Help);
        assert_eq!(parse_command("  /copy  "), Command::Copy);
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(
            parse_command("/frobnicate"),
            Command::Unknown("/frobnicate".to_string())
        );
    }
}
