//! JSON strategy-configuration slot adapter.
//!
//! Replacement writes a sibling temp file and renames it over the slot, so
//! concurrent readers always see a complete configuration.

use crate::domain::error::GridtraderError;
use crate::domain::strategy::StrategyConfig;
use crate::ports::slot_port::StrategySlotPort;
use std::fs;
use std::io;
use std::path::PathBuf;

pub struct JsonSlotAdapter {
    path: PathBuf,
}

impl JsonSlotAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn slot_error(reason: String) -> GridtraderError {
    GridtraderError::StrategySlot { reason }
}

impl StrategySlotPort for JsonSlotAdapter {
    fn read_latest(&self) -> Result<Option<StrategyConfig>, GridtraderError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(slot_error(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| slot_error(format!("invalid slot contents: {}", e)))
    }

    fn replace(&self, config: &StrategyConfig) -> Result<(), GridtraderError> {
        let json = serde_json::to_string(config)
            .map_err(|e| slot_error(format!("serialize failed: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)
            .map_err(|e| slot_error(format!("failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            slot_error(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}
