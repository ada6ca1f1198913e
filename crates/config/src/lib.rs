// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default schema version for YAML configs
fn default_schema_version() -> String {
    "1.0".to_string()
}

/// How an instruction observes the PC when it names PC as a source operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PcReadConvention {
    /// The stored PC already holds the architectural read value (fetch address + 4).
    /// The owning fetch loop advances it before handing the word to the core.
    #[default]
    #[serde(alias = "raw")]
    Stored,
    /// The stored PC holds the fetch address; the core adds the 4-byte pipeline offset.
    #[serde(alias = "fetch-plus-4")]
    PipelineAhead,
}

impl PcReadConvention {
    pub const fn read_offset(self) -> u32 {
        match self {
            PcReadConvention::Stored => 0,
            PcReadConvention::PipelineAhead => 4,
        }
    }
}

/// Which banked stack pointer the symbolic SP register resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackSelect {
    #[default]
    #[serde(alias = "msp")]
    Main,
    #[serde(alias = "psp")]
    Process,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetState {
    #[serde(default)]
    pub msp: u32,
    #[serde(default)]
    pub psp: u32,
    #[serde(default)]
    pub pc: u32,
    #[serde(default)]
    pub lr: u32,
    #[serde(default)]
    pub stack: StackSelect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub pc_read: PcReadConvention,
    #[serde(default)]
    pub reset: ResetState,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            pc_read: PcReadConvention::default(),
            reset: ResetState::default(),
        }
    }
}

impl CoreConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read core config at {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Invalid core config at {:?}", path.as_ref()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Failed to parse core config")?;
        config.validate()?;
        tracing::debug!(
            "Loaded core config: pc_read={:?}, stack={:?}",
            config.pc_read,
            config.reset.stack
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '1.0'",
                self.schema_version
            );
        }

        if self.reset.msp & 0x3 != 0 {
            anyhow::bail!("Reset 'msp' {:#x} must be word aligned", self.reset.msp);
        }

        if self.reset.psp & 0x3 != 0 {
            anyhow::bail!("Reset 'psp' {:#x} must be word aligned", self.reset.psp);
        }

        if self.reset.pc & 0x1 != 0 {
            anyhow::bail!("Reset 'pc' {:#x} must be halfword aligned", self.reset.pc);
        }

        Ok(())
    }
}
