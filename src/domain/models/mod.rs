pub mod recommendations;
pub mod test;
pub mod user;

pub use recommendations::{recommendations_for_stage, stage_is_no_dr, REFERRAL_NOTICE};
pub use test::{
    CandidateImage, GalleryEntry, MonthlyBucket, ReportMeta, TestHistoryRecord, TestResult,
    TestStatus,
};
pub use user::{Session, User};
