//! Configuration for the test harness.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** The standard memory map, device addresses and result register.
//! 2. **Structures:** Nested config for general options, memory and devices.
//! 3. **Validation:** Consistency checks run before an address space is built.
//!
//! Configuration is read from JSON (`--config` on the CLI) or taken from
//! `HarnessConfig::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants;
use crate::common::error::ConfigError;

/// Default configuration values.
mod defaults {
    use crate::common::constants;

    pub const MEM_BASE: u32 = constants::PHYS_MEM_BASE;
    pub const MEM_SIZE: u32 = constants::PHYS_MEM_SIZE;
    pub const RTC_ADDR: u32 = constants::RTC_ADDR;
    pub const SERIAL_ADDR: u32 = constants::SERIAL_PORT;
    pub const RESULT_REG: usize = constants::RESULT_REG;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use dutbench_core::config::HarnessConfig;
///
/// let config = HarnessConfig::default();
/// assert_eq!(config.memory.base, 0x8000_0000);
/// assert!(config.general.itrace);
/// ```
///
/// Partial JSON documents fall back to defaults field by field:
///
/// ```
/// use dutbench_core::config::HarnessConfig;
///
/// let json = r#"{ "memory": { "size": 65536 }, "general": { "itrace": false } }"#;
/// let config = HarnessConfig::from_json(json).unwrap();
/// assert_eq!(config.memory.base, 0x8000_0000);
/// assert_eq!(config.memory.size, 65536);
/// assert!(!config.general.itrace);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Run options (itrace, result register, default image).
    #[serde(default)]
    pub general: GeneralConfig,
    /// Physical memory window.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Memory-mapped device addresses.
    #[serde(default)]
    pub devices: DeviceConfig,
}

impl HarnessConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation error
    /// from [`HarnessConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`HarnessConfig::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks the memory map for inconsistencies.
    ///
    /// Device addresses must lie outside the memory window so that device
    /// accesses never reach backing storage.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let MemoryConfig { base, size } = self.memory;
        if size == 0 {
            return Err(ConfigError::EmptyMemory);
        }
        if u64::from(base) + u64::from(size) > 1 << 32 {
            return Err(ConfigError::WindowOverflow { base, size });
        }
        for (device, addr) in [
            ("clock", self.devices.rtc_addr),
            ("serial", self.devices.serial_addr),
        ] {
            if self.memory.contains(addr) {
                return Err(ConfigError::DeviceInsideMemory { device, addr });
            }
        }
        if self.devices.rtc_addr == self.devices.serial_addr {
            return Err(ConfigError::DeviceCollision(self.devices.rtc_addr));
        }
        if self.general.result_reg == 0 || self.general.result_reg >= 32 {
            return Err(ConfigError::ResultRegister(self.general.result_reg));
        }
        Ok(())
    }
}

/// General run options.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Record fetches into the itrace ring and dump it on failure.
    #[serde(default = "GeneralConfig::default_itrace")]
    pub itrace: bool,

    /// Register read at halt; zero means pass.
    #[serde(default = "GeneralConfig::default_result_reg")]
    pub result_reg: usize,

    /// Image used when neither the command line nor `IMG` names one.
    #[serde(default = "GeneralConfig::default_image")]
    pub default_image: String,

    /// Log every instruction the reference core retires at `trace` level.
    #[serde(default)]
    pub trace_instructions: bool,
}

impl GeneralConfig {
    const fn default_itrace() -> bool {
        true
    }

    const fn default_result_reg() -> usize {
        defaults::RESULT_REG
    }

    fn default_image() -> String {
        constants::DEFAULT_IMAGE_PATH.to_string()
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            itrace: Self::default_itrace(),
            result_reg: Self::default_result_reg(),
            default_image: Self::default_image(),
            trace_instructions: false,
        }
    }
}

/// Physical memory window.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// First addressable byte.
    #[serde(default = "MemoryConfig::default_base")]
    pub base: u32,

    /// Window length in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: u32,
}

impl MemoryConfig {
    const fn default_base() -> u32 {
        defaults::MEM_BASE
    }

    const fn default_size() -> u32 {
        defaults::MEM_SIZE
    }

    /// One past the last addressable byte, widened so it cannot wrap.
    pub fn end(&self) -> u64 {
        u64::from(self.base) + u64::from(self.size)
    }

    /// Returns `true` when `addr` lies inside the window.
    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.base && u64::from(addr) < self.end()
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: Self::default_base(),
            size: Self::default_size(),
        }
    }
}

/// Memory-mapped device addresses.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Clock device (read-only microsecond counter).
    #[serde(default = "DeviceConfig::default_rtc_addr")]
    pub rtc_addr: u32,

    /// Serial-output device (write-only, one character per write).
    #[serde(default = "DeviceConfig::default_serial_addr")]
    pub serial_addr: u32,
}

impl DeviceConfig {
    const fn default_rtc_addr() -> u32 {
        defaults::RTC_ADDR
    }

    const fn default_serial_addr() -> u32 {
        defaults::SERIAL_ADDR
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            rtc_addr: Self::default_rtc_addr(),
            serial_addr: Self::default_serial_addr(),
        }
    }
}
