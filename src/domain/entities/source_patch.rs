//! Literal source patch entity

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single literal find/replace edit against a file in the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePatch {
    /// Path relative to the secondary (output) tree root
    pub file: PathBuf,
    pub find: String,
    pub replace: String,
    /// Short human label for logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SourcePatch {
    pub fn new(file: impl Into<PathBuf>, find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            find: find.into(),
            replace: replace.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Patches for the known rewriter blind spots in the dav1d tree.
    pub fn builtin() -> Vec<SourcePatch> {
        vec![
            SourcePatch::new(
                "src/lib.c",
                "dlsym(RTLD_DEFAULT, \"__pthread_get_minstack\")",
                "IA2_FNPTR_WRAPPER(dlsym(RTLD_DEFAULT, \"__pthread_get_minstack\"))",
            )
            .with_reason("dynamic symbol used as a function pointer"),
            SourcePatch::new(
                "src/lib.c",
                "s->allocator.alloc_picture_callback != NULL",
                "IA2_ADDR(s->allocator.alloc_picture_callback) != NULL",
            )
            .with_reason("callback null comparison"),
            SourcePatch::new(
                "src/lib.c",
                "s->allocator.release_picture_callback != NULL",
                "IA2_ADDR(s->allocator.release_picture_callback) != NULL",
            )
            .with_reason("callback null comparison"),
            SourcePatch::new("ia2/callgate_wrapper.h", "struct __va_list_tag *", "va_list ")
                .with_reason("compiler-internal va_list tag"),
            SourcePatch::new(
                "tools/dav1d.c",
                "signal(SIGINT, signal_handler)",
                "signal(SIGINT, IA2_IGNORE(signal_handler))",
            )
            .with_reason("signal handler must be the raw address"),
        ]
    }
}
