//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`] for the boiler
//! controller.
//!
//! # Layout
//!
//! - Namespace `boiler`, one key per configuration register
//!   ([`ConfigRegister::nvs_key`]), each value two bytes little-endian.
//!   Writing one register never rewrites the others.
//! - Run-time totals live in the same namespace as a postcard blob
//!   (see [`RunTimeTotals`](crate::control::runtime::RunTimeTotals)).
//! - Atomic writes: ESP-IDF NVS commits are atomic per nvs_commit().

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::{ConfigRegister, SystemConfig};
use log::{info, warn};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub const CONFIG_NAMESPACE: &str = "boiler";

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// Returns `Err(ConfigError::IoError)` if flash initialisation fails
    /// unrecoverably. On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32 || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32 {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as i32 {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK as i32 {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK as i32 {
                return Err(ConfigError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// NUL-terminated copy of an NVS name (max 15 bytes).
    #[cfg(target_os = "espidf")]
    fn c_name(name: &str) -> [u8; 16] {
        let mut buf = [0u8; 16];
        let bytes = name.as_bytes();
        let len = bytes.len().min(15);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let ns_buf = Self::c_name(namespace);
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        // SAFETY: ns_buf is NUL-terminated and outlives the call.
        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }

        let result = f(handle);
        // SAFETY: handle was opened above and is closed exactly once.
        unsafe {
            nvs_close(handle);
        }
        result
    }

    // ── Raw blob access shared by both ports ─────────────────────

    #[cfg(not(target_os = "espidf"))]
    fn get(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.store.borrow().get(&Self::composite_key(namespace, key)) {
            Some(data) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                Ok(len)
            }
            None => Err(StorageError::NotFound),
        }
    }

    #[cfg(target_os = "espidf")]
    fn get(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let key_buf = Self::c_name(key);
        let result = Self::with_nvs_handle(namespace, false, |handle| {
            let mut size = buf.len();
            // SAFETY: buf is valid for `size` bytes; key_buf is NUL-terminated.
            let ret = unsafe {
                nvs_get_blob(handle, key_buf.as_ptr() as *const _, buf.as_mut_ptr() as *mut _, &mut size)
            };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            Ok(size)
        });
        match result {
            Ok(size) => Ok(size),
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND as i32 => Err(StorageError::NotFound),
            Err(e) if e == ESP_ERR_NVS_INVALID_LENGTH as i32 => Err(StorageError::Corrupted),
            Err(_) => Err(StorageError::IoError),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn put(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store
            .borrow_mut()
            .insert(Self::composite_key(namespace, key), data.to_vec());
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn put(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let key_buf = Self::c_name(key);
        let result = Self::with_nvs_handle(namespace, true, |handle| {
            // SAFETY: data is valid for data.len() bytes; key_buf is NUL-terminated.
            let ret = unsafe {
                nvs_set_blob(handle, key_buf.as_ptr() as *const _, data.as_ptr() as *const _, data.len())
            };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            // SAFETY: handle is open for writing.
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            Ok(())
        });
        result.map_err(|e| {
            warn!("NvsAdapter: write {}::{} failed ({})", namespace, key, e);
            if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE as i32 {
                StorageError::Full
            } else {
                StorageError::IoError
            }
        })
    }

    /// Stored value of one register, `None` if never written.
    fn read_register(&self, register: ConfigRegister) -> Result<Option<u16>, ConfigError> {
        let mut buf = [0u8; 4];
        match self.get(CONFIG_NAMESPACE, register.nvs_key(), &mut buf) {
            Ok(2) => Ok(Some(u16::from_le_bytes([buf[0], buf[1]]))),
            Ok(len) => {
                warn!("NvsAdapter: register {} has {} bytes, ignoring", register.nvs_key(), len);
                Ok(None)
            }
            Err(StorageError::NotFound) => Ok(None),
            Err(StorageError::Corrupted) => {
                warn!("NvsAdapter: register {} unreadable, ignoring", register.nvs_key());
                Ok(None)
            }
            Err(StorageError::Full) => Err(ConfigError::StorageFull),
            Err(StorageError::IoError) => Err(ConfigError::IoError),
        }
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let mut config = SystemConfig::default();
        let mut stored = 0;
        for register in ConfigRegister::ALL {
            if let Some(value) = self.read_register(register)? {
                config.set_register(register, value);
                stored += 1;
            }
        }
        info!(
            "NvsAdapter: config loaded ({} of {} registers stored)",
            stored,
            ConfigRegister::ALL.len()
        );
        Ok(config)
    }

    fn save_register(&self, register: ConfigRegister, value: u16) -> Result<(), ConfigError> {
        self.put(CONFIG_NAMESPACE, register.nvs_key(), &value.to_le_bytes())
            .map_err(|e| match e {
                StorageError::Full => ConfigError::StorageFull,
                _ => ConfigError::IoError,
            })
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        self.get(namespace, key, buf)
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.put(namespace, key, data)
    }
}
