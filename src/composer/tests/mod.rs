use super::test_helpers::*;
use super::*;
use crate::backend::SendResponse;
use crate::compose::ComposeForm;
use crate::error::{Error, ValidationError};
use crate::types::{CsvUpload, Event, GeneratedEmail, NoticeLevel, SendingMode, TaskId, TaskStatus};

mod recipients;
