pub mod notice_writer;
pub mod notifier;
pub mod review;

pub use notice_writer::NoticeWriter;
pub use notifier::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use review::{RequiredProgress, ReviewLine, ReviewSection, SectionProgress};
