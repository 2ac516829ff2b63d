//! Battery level from the Linux power-supply class
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

/// Default sysfs location of power supplies
pub const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryStatus {
    pub percent: u8,
    pub plugged: bool,
}

impl BatteryStatus {
    pub fn describe(&self) -> String {
        let charging = if self.plugged {
            "charging"
        } else {
            "not charging"
        };
        format!(
            "Battery is at {}% and is currently {charging}.",
            self.percent
        )
    }
}

#[async_trait]
pub trait BatteryProbe: Send + Sync {
    /// `None` when the machine has no readable battery
    async fn query(&self) -> Option<BatteryStatus>;
}

pub struct SysfsBattery {
    root: PathBuf,
}

impl SysfsBattery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for SysfsBattery {
    fn default() -> Self {
        Self::new(POWER_SUPPLY_ROOT)
    }
}

async fn read_attr(dir: &Path, name: &str) -> Option<String> {
    tokio::fs::read_to_string(dir.join(name))
        .await
        .ok()
        .map(|s| s.trim().to_string())
}

#[async_trait]
impl BatteryProbe for SysfsBattery {
    async fn query(&self) -> Option<BatteryStatus> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot read {}: {e}", self.root.display());
                return None;
            }
        };

        let mut battery: Option<(u8, String)> = None;
        let mut mains_online = false;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let dir = entry.path();
            match read_attr(&dir, "type").await.as_deref() {
                Some("Battery") if battery.is_none() => {
                    let Some(percent) = read_attr(&dir, "capacity")
                        .await
                        .and_then(|c| c.parse::<u8>().ok())
                    else {
                        continue;
                    };
                    let status = read_attr(&dir, "status").await.unwrap_or_default();
                    battery = Some((percent.min(100), status));
                }
                Some("Mains") => {
                    if read_attr(&dir, "online").await.as_deref() == Some("1") {
                        mains_online = true;
                    }
                }
                _ => {}
            }
        }

        battery.map(|(percent, status)| BatteryStatus {
            percent,
            plugged: mains_online || matches!(status.as_str(), "Charging" | "Full"),
        })
    }
}
