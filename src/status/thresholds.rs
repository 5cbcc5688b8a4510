//! Per-record threshold checks
//!
//! Runs after an internal page's record is complete and reports one problem
//! per violated instance through the status boundary.

use crate::config::ThresholdConfig;
use crate::status::{ProblemKind, StatusReporter};
use crate::store::PageRecord;

/// Checks one completed internal PageRecord against the configured limits
pub fn check_record(
    record: &PageRecord,
    thresholds: &ThresholdConfig,
    reporter: &dyn StatusReporter,
) {
    for title in &record.titles {
        if title.char_length > thresholds.title_char_max
            || title.char_length < thresholds.title_char_min
        {
            reporter.problem(ProblemKind::TitleCharLength);
        }
        if title.pixel_width > thresholds.title_pixel_max
            || title.pixel_width < thresholds.title_pixel_min
        {
            reporter.problem(ProblemKind::TitlePixelWidth);
        }
    }

    for desc in &record.meta_descriptions {
        if desc.char_length > thresholds.description_char_max
            || desc.char_length < thresholds.description_char_min
        {
            reporter.problem(ProblemKind::DescriptionCharLength);
        }
        if desc.pixel_width > thresholds.description_pixel_max
            || desc.pixel_width < thresholds.description_pixel_min
        {
            reporter.problem(ProblemKind::DescriptionPixelWidth);
        }
    }

    if record.address.len() as u32 > thresholds.url_char_max {
        reporter.problem(ProblemKind::UrlLength);
    }

    for heading in &record.headings_one {
        if heading.char_length > thresholds.heading_one_char_max {
            reporter.problem(ProblemKind::HeadingOneLength);
        }
    }

    for heading in &record.headings_two {
        if heading.char_length > thresholds.heading_two_char_max {
            reporter.problem(ProblemKind::HeadingTwoLength);
        }
    }

    if record.byte_size > thresholds.image_size_max && record.content_type.contains("image") {
        reporter.problem(ProblemKind::ImageSize);
    }
}
