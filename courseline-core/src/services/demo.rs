//! Demo service - manage demo mode
//!
//! Demo mode provides sample data for testing and onboarding without
//! touching the real catalog. The demo slices live in their own `demo/`
//! subdirectory and are reseeded from scratch on every enable.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::json;

use crate::adapters::demo::{generate_demo_courses, generate_demo_enrollments, generate_demo_users};
use crate::adapters::JsonFileStore;
use crate::config::Config;
use crate::ports::store::keys;
use crate::ports::StateStore;

/// Demo service for managing demo mode
pub struct DemoService {
    courseline_dir: PathBuf,
}

impl DemoService {
    pub fn new(courseline_dir: &Path) -> Self {
        Self {
            courseline_dir: courseline_dir.to_path_buf(),
        }
    }

    /// The directory holding the demo slices
    pub fn demo_dir(&self) -> PathBuf {
        self.courseline_dir.join("demo")
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.courseline_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// This will:
    /// 1. Delete any existing demo data (fresh start)
    /// 2. Enable demo mode in config
    /// 3. Seed the demo store with sample users, courses and enrollments
    pub fn enable(&self) -> Result<()> {
        let demo_dir = self.demo_dir();
        if demo_dir.exists() {
            std::fs::remove_dir_all(&demo_dir)?;
        }

        let mut config = Config::load(&self.courseline_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.courseline_dir)?;

        let store = JsonFileStore::new(&demo_dir)?;
        let users = generate_demo_users();
        let courses = generate_demo_courses();
        let enrollments = generate_demo_enrollments(&users, &courses);

        store.save(keys::USERS, &serde_json::to_value(&users)?)?;
        store.save(keys::COURSES, &json!({ "courses": courses }))?;
        store.save(keys::ENROLLMENTS, &json!({ "enrollments": enrollments }))?;

        Ok(())
    }

    /// Disable demo mode
    ///
    /// This will:
    /// 1. Disable demo mode in config
    /// 2. Optionally delete the demo data (if clean = true)
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.courseline_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.courseline_dir)?;

        if clean {
            let demo_dir = self.demo_dir();
            if demo_dir.exists() {
                std::fs::remove_dir_all(&demo_dir)?;
            }
        }

        Ok(())
    }
}
