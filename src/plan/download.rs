//! Fetch-directive planning and shell rendering
//!
//! One directive per path element per file entry, in category/item
//! enumeration order. Whether a key names a single object or a prefix
//! is not known at planning time; each rendered block carries both
//! branches behind an `aws s3 ls` probe evaluated when the script runs.

use std::fmt::Write;

use crate::descriptor::Job;
use crate::plan::INPUT_DIR;

/// Compression codec inferred from a file extension.
///
/// Unrecognized extensions mean "no decompression step", never an error.
/// Extend by adding variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    #[default]
    None,
    Gzip,
    Bzip2,
}

impl Codec {
    /// Infer the codec from a storage key's extension.
    pub fn infer(key: &str) -> Self {
        if key.ends_with(".gz") {
            Codec::Gzip
        } else if key.ends_with(".bz2") {
            Codec::Bzip2
        } else {
            Codec::None
        }
    }

    /// Extension matched by this codec, without the leading dot.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Codec::None => None,
            Codec::Gzip => Some("gz"),
            Codec::Bzip2 => Some("bz2"),
        }
    }

    fn decompress_program(&self) -> Option<&'static str> {
        match self {
            Codec::None => None,
            Codec::Gzip => Some("gunzip"),
            Codec::Bzip2 => Some("bzip2 -d"),
        }
    }

    /// Decompression command for an exact target file, trailing `;` included.
    fn single_command(&self, target: &str) -> String {
        match self.decompress_program() {
            Some(program) => format!("{} {};", program, target),
            None => String::new(),
        }
    }

    /// Decompression loop for a recursively copied directory: scan every
    /// file under the target and decompress the ones matching the codec.
    fn recursive_command(&self, target: &str) -> String {
        match (self.decompress_program(), self.extension()) {
            (Some(program), Some(ext)) => format!(
                "for f in `find {} -type f`; do if [[ $f =~ \\.{}$ ]]; then {} $f; fi; done;",
                target, ext, program
            ),
            _ => String::new(),
        }
    }
}

/// One unit of the generated fetch script: a conditional copy of a
/// single storage key, with an optional decompression step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDirective {
    /// Bucket (optionally with key prefix) to copy from
    pub location: String,
    /// Relative key under `location`
    pub key: String,
    /// Local target path, disjoint from every other directive's target
    pub target: String,
    /// Credential profile; when set, every copy carries `--profile`
    pub profile: Option<String>,
    /// Decompression codec inferred from the key's extension
    pub codec: Codec,
}

impl FetchDirective {
    /// Render the directive as one shell block.
    ///
    /// The probe lists `key/` as a prefix: a non-empty listing means the
    /// key denotes a directory of objects and the copy recurses; an
    /// empty listing means a single object copied to the exact target.
    pub fn render(&self) -> String {
        let profile_flag = match &self.profile {
            Some(profile) => format!("--profile {}", profile),
            None => String::new(),
        };
        format!(
            "if [[ -z $(aws s3 ls s3://{loc}/{key}/ {flag}) ]]; \
             then aws s3 cp s3://{loc}/{key} {target} {flag}; {single} \
             else aws s3 cp --recursive s3://{loc}/{key} {target} {flag}; {recursive} fi\n",
            loc = self.location,
            key = self.key,
            target = self.target,
            flag = profile_flag,
            single = self.codec.single_command(&self.target),
            recursive = self.codec.recursive_command(&self.target),
        )
    }
}

/// Plan the ordered fetch directives for a job.
///
/// Deterministic for a fixed descriptor: categories in declared order,
/// items by name, path elements in declared order.
pub fn plan_downloads(job: &Job) -> Vec<FetchDirective> {
    let mut directives = Vec::new();
    for (category, entries) in job.input.file_categories() {
        for (item, entry) in entries {
            for element in entry.path.elements() {
                // A trailing slash on a declared key would break the
                // prefix probe; normalize it away.
                let key = element.trim_end_matches('/');
                if key.is_empty() {
                    continue;
                }
                let directive = FetchDirective {
                    location: entry.location.clone(),
                    key: key.to_string(),
                    target: format!("{}/{}", INPUT_DIR, key),
                    profile: entry.profile.clone(),
                    codec: Codec::infer(key),
                };
                tracing::debug!(category, item = %item, key, "planned fetch directive");
                directives.push(directive);
            }
        }
    }
    directives
}

/// Render all directives into the fetch script body.
pub fn render_download_script(directives: &[FetchDirective]) -> String {
    let mut script = String::new();
    for directive in directives {
        // write! to a String cannot fail
        let _ = write!(script, "{}", directive.render());
    }
    script
}
