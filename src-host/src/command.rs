//! Line commands understood by the headless host

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    LoadStart,
    LoadEnd,
    LoadError(String),
    Navigate { url: String, can_go_back: bool },
    Back,
    Retry,
    Home,
    Online,
    Offline,
    Check,
    Allow(String),
    Quit,
}

impl FromStr for HostCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "start" => Ok(HostCommand::LoadStart),
            "end" => Ok(HostCommand::LoadEnd),
            "error" => {
                let description = if rest.is_empty() { "load failed" } else { rest };
                Ok(HostCommand::LoadError(description.to_string()))
            }
            "nav" => {
                let mut parts = rest.split_whitespace();
                let url = parts
                    .next()
                    .ok_or_else(|| "usage: nav <url> [back]".to_string())?;
                let can_go_back = matches!(parts.next(), Some("back"));
                Ok(HostCommand::Navigate {
                    url: url.to_string(),
                    can_go_back,
                })
            }
            "back" => Ok(HostCommand::Back),
            "retry" => Ok(HostCommand::Retry),
            "home" => Ok(HostCommand::Home),
            "online" => Ok(HostCommand::Online),
            "offline" => Ok(HostCommand::Offline),
            "check" => Ok(HostCommand::Check),
            "allow" if !rest.is_empty() => Ok(HostCommand::Allow(rest.to_string())),
            "allow" => Err("usage: allow <url>".to_string()),
            "quit" | "exit" => Ok(HostCommand::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!("start".parse(), Ok(HostCommand::LoadStart));
        assert_eq!("  END ".parse(), Ok(HostCommand::LoadEnd));
        assert_eq!("back".parse(), Ok(HostCommand::Back));
        assert_eq!("exit".parse(), Ok(HostCommand::Quit));
    }

    #[test]
    fn test_parse_error() {
        assert_eq!(
            "error net::ERR_FAILED".parse(),
            Ok(HostCommand::LoadError("net::ERR_FAILED".to_string()))
        );
        assert_eq!(
            "error".parse(),
            Ok(HostCommand::LoadError("load failed".to_string()))
        );
    }

    #[test]
    fn test_parse_nav() {
        assert_eq!(
            "nav https://other.example/ back".parse(),
            Ok(HostCommand::Navigate {
                url: "https://other.example/".to_string(),
                can_go_back: true
            })
        );
        assert_eq!(
            "nav https://other.example/".parse(),
            Ok(HostCommand::Navigate {
                url: "https://other.example/".to_string(),
                can_go_back: false
            })
        );
        assert!("nav".parse::<HostCommand>().is_err());
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("".parse::<HostCommand>().is_err());
        assert!("allow".parse::<HostCommand>().is_err());
        assert!("dance".parse::<HostCommand>().is_err());
    }
}
