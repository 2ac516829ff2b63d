//! # Greeting Feature
//!
//! Time-of-day greeting spoken once at startup.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub const INTRODUCTION: &str = "I am your virtual assistant. How can I assist you today?";

/// Greeting for a local hour in `0..24`
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning!",
        12..=17 => "Good afternoon!",
        18..=21 => "Good evening!",
        _ => "Working late?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting_for_hour(4), "Working late?");
        assert_eq!(greeting_for_hour(5), "Good morning!");
        assert_eq!(greeting_for_hour(11), "Good morning!");
        assert_eq!(greeting_for_hour(12), "Good afternoon!");
        assert_eq!(greeting_for_hour(17), "Good afternoon!");
        assert_eq!(greeting_for_hour(18), "Good evening!");
        assert_eq!(greeting_for_hour(21), "Good evening!");
        assert_eq!(greeting_for_hour(22), "Working late?");
        assert_eq!(greeting_for_hour(0), "Working late?");
    }
}
