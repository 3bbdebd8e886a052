/// Load-time checks against the configured [`Limits`].
use crate::ooxml::error::ValidationError;
use crate::ooxml::pptx::config::Limits;
use log::warn;

/// Reject a package whose byte size exceeds `limits.max_package_size`.
pub fn check_package_size(size: u64, limits: &Limits) -> Result<(), ValidationError> {
    if size > limits.max_package_size {
        warn!(
            "Rejecting presentation of {} bytes (maximum {})",
            size, limits.max_package_size
        );
        return Err(ValidationError::PresentationTooLarge {
            size,
            max: limits.max_package_size,
        });
    }
    Ok(())
}

/// Reject a presentation with more than `limits.max_slides` slides.
pub fn check_slide_count(count: usize, limits: &Limits) -> Result<(), ValidationError> {
    if count > limits.max_slides {
        warn!(
            "Rejecting presentation with {} slides (maximum {})",
            count, limits.max_slides
        );
        return Err(ValidationError::TooManySlides {
            count,
            max: limits.max_slides,
        });
    }
    Ok(())
}
