//! User-agent classification for visit analytics.
//!
//! Parsing is delegated to `woothee`; its browser and OS names are folded
//! onto the small label sets stored with each visit. Unrecognised agents get
//! `Other` / `Unknown`, never an error.

use woothee::parser::Parser;

/// Browser and platform labels recorded with a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAgentLabels {
    /// One of `Chrome`, `Firefox`, `Safari`, `Edge`, `Opera`, `Other`.
    pub browser: &'static str,
    /// One of `iOS`, `Android`, `MacOS`, `Windows`, `Linux`, `Unknown`.
    pub device_type: &'static str,
}

impl UserAgentLabels {
    pub fn parse(user_agent: &str) -> Self {
        let result = Parser::new().parse(user_agent).unwrap_or_default();

        Self {
            browser: browser_label(result.name, user_agent),
            device_type: device_label(result.os),
        }
    }
}

fn browser_label(name: &str, user_agent: &str) -> &'static str {
    match name {
        // Chromium-based Edge identifies as Chrome plus an `Edg/` product token.
        "Chrome" if user_agent.contains(" Edg/") => "Edge",
        "Chrome" => "Chrome",
        "Firefox" => "Firefox",
        "Safari" => "Safari",
        "Edge" => "Edge",
        "Opera" => "Opera",
        _ => "Other",
    }
}

fn device_label(os: &str) -> &'static str {
    match os {
        "iPhone" | "iPad" | "iPod" | "iOS" => "iOS",
        "Android" => "Android",
        "Mac OSX" | "Mac OS Classic" => "MacOS",
        "Linux" => "Linux",
        os if os.starts_with("Windows") => "Windows",
        _ => "Unknown",
    }
}
