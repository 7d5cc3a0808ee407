mod downgrade_chain;
mod encoding_detector;

pub use downgrade_chain::DowngradeChain;
pub use encoding_detector::EncodingDetector;
