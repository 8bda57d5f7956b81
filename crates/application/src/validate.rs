use veritrail_core::{AuditError, AuditResult};

/// Rejects blank required input before any store or permission interaction.
pub(crate) fn require_not_blank<'a>(value: &'a str, field: &str) -> AuditResult<&'a str> {
    if value.trim().is_empty() {
        return Err(AuditError::InvalidArgument(format!(
            "{field} must not be blank"
        )));
    }

    Ok(value)
}

/// Rejects a name list containing a blank element. The whole call fails;
/// nothing is partially applied.
pub(crate) fn require_no_blank_elements(values: &[String], field: &str) -> AuditResult<()> {
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(AuditError::InvalidArgument(format!(
            "{field} must not contain a blank value"
        )));
    }

    Ok(())
}
