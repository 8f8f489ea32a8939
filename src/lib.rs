/*!
# EOR Dashboard

A browser-based dashboard for screening Enhanced Oil Recovery (EOR) methods,
built in Rust on top of a spreadsheet workbook.

## Overview

The screening itself lives in an Excel workbook. This crate reads two fixed
blocks out of it once at start-up, reshapes them into small tables, and
serves them as a five-tab page:

1. **Scores**: final score per method, rows with a validation of 0 highlighted
2. **Unmet Criteria**: every screening criterion a method does not meet
3. **Bar Chart**: final score per method
4. **Radar Chart**: all methods on one polygon, radial axis 0 to 10
5. **Author Information**: static text plus a download of a companion workbook

## Architecture

- **cell**: `CellValue`, the loaders' view of a spreadsheet cell
- **workbook**: scoped, read-only workbook handle and positional sheet slicing
- **loader**: score and criteria table extraction (offsets, coercion, forward fill)
- **highlight**: per-row display style
- **graph**: bar and radar charts drawn to SVG with plotters
- **downloader**: the optional download file, CSV and XLSX export of the tables
- **render**: the HTML page
- **app**: routing

The workbook is opened, both tables are loaded, and the handle is dropped
before the server starts. Every request then renders from immutable data; the
only per-request I/O is checking (and serving) the download file.

## HTTP Endpoints

- `/` - The dashboard page
- `/api/scores`, `/api/criteria` - Tables as JSON
- `/charts/bar.svg`, `/charts/radar.svg` - Charts on their own
- `/download` - The companion workbook, 404 when it is missing
- `/export/scores.csv`, `/export/criteria.csv`, `/export/tables.xlsx` - Table exports
*/

pub mod cell;
pub mod config;
pub mod downloader;
pub mod error;
pub mod highlight;
pub mod loader;
pub mod workbook;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod graph;
#[cfg(feature = "web")]
pub mod render;

pub use cell::*;
pub use downloader::*;
pub use error::{DashboardError, Result};
pub use highlight::*;
pub use loader::*;
pub use workbook::*;
