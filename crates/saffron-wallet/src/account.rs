//! Account records
//!
//! An account is immutable once created: its index is both its position in
//! the derivation path and its storage key, and indices are assigned
//! sequentially starting at 0, never reused. Only the separate "current
//! account" pointer changes over a wallet's life.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A derived account and its two address forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Position in the derivation path and storage key
    pub index: u32,
    /// Base address receiving funds
    pub payment_addr: String,
    /// Reward address collecting staking rewards
    pub reward_addr: String,
    /// User-chosen display name
    pub name: String,
    /// Display avatar chosen at creation
    pub avatar: Avatar,
}

/// Display avatar: a mood and a color, both picked at random on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Avatar {
    pub mood: Mood,
    /// CSS hex color, `#rrggbb`
    pub color: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Shocked,
    Happy,
    Blissful,
    Excited,
}

const MOODS: [Mood; 4] = [Mood::Shocked, Mood::Happy, Mood::Blissful, Mood::Excited];

impl Avatar {
    /// Pick a random mood and color for a new account.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            mood: MOODS[rng.gen_range(0..MOODS.len())],
            color: format!("#{:06x}", rng.gen_range(0u32..0x100_0000)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_avatar_color_format() {
        for _ in 0..20 {
            let avatar = Avatar::random();
            assert_eq!(avatar.color.len(), 7);
            assert!(avatar.color.starts_with('#'));
            assert!(avatar.color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_account_serde_roundtrip() {
        let account = Account {
            index: 0,
            payment_addr: "addr1xyz".to_string(),
            reward_addr: "stake1xyz".to_string(),
            name: "Main".to_string(),
            avatar: Avatar {
                mood: Mood::Happy,
                color: "#00ff88".to_string(),
            },
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("\"mood\":\"happy\""));
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }
}
