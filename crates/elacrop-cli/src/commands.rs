//! Line-oriented keyboard commands read from stdin in interactive mode.

/// Key commands of the rotate-crop demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCommand {
    /// Begin, or restart, the sweep.
    Start,
    Quit,
}

impl DemoCommand {
    /// Anything other than lowercase `s` or `q` is ignored.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "s" => Some(Self::Start),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Slider changes for the ELA tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElaCommand {
    Scale(u8),
    Quality(u8),
    Quit,
}

impl ElaCommand {
    /// Parse `scale N`, `quality N` or `q`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or_else(|| "empty command".to_string())?;

        if matches!(command, "q" | "quit") {
            return Ok(Self::Quit);
        }

        let value = words
            .next()
            .ok_or_else(|| format!("{} needs a value", command))?;
        if words.next().is_some() {
            return Err(format!("too many arguments to {}", command));
        }
        let value: u8 = value
            .parse()
            .map_err(|_| format!("invalid value: {}", value))?;

        match command {
            "scale" => Ok(Self::Scale(value)),
            "quality" => Ok(Self::Quality(value)),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}
