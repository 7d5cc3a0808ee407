/// ProgressReporter port for reporting progress during a conversion
///
/// Messages go to the user (e.g. on stderr) and never mix with the
/// converted document.
pub trait ProgressReporter {
    /// Reports a status message
    fn report(&self, message: &str);

    /// Reports one step of a multi-step operation
    ///
    /// # Arguments
    /// * `current` - Steps completed so far
    /// * `total` - Total expected steps
    /// * `message` - Optional message for the step
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of the operation
    fn report_completion(&self, message: &str);
}
