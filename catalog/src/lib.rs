//! Catalog - course catalog client
//!
//! Fetches the university course catalog and reduces it to the two listings
//! the planner needs: departments with their subject prefixes, and the courses
//! offered by one department.
//!
//! # Example
//!
//! ```ignore
//! use catalog::{CatalogClient, CatalogConfig};
//!
//! let client = CatalogClient::new(CatalogConfig::default())?;
//! let departments = client.departments().await?;
//! let courses = client.courses_by_department("Electrical Engineering").await?;
//! ```

pub mod cli;
mod client;
pub mod config;

pub use client::{
    CatalogClient, CatalogCourse, CourseDetails, CourseRecord, Department, SubjectCode, collect_departments,
    course_record,
};
pub use config::CatalogConfig;

/// Default catalog API root
pub const DEFAULT_BASE_URL: &str = "https://uri.kuali.co/api/v1/catalog";

/// Default catalog identifier
pub const DEFAULT_CATALOG_ID: &str = "65269fc6daaf7e001cdeda4c";
