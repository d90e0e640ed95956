use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const ACTIVE_TASKS_DIR: &str = ".claude/active-tasks";
pub const RULES_FILE: &str = ".claude/hooks/config/skill-rules.json";
pub const DEFAULT_SKILLS_DIR: &str = ".claude/skills";

pub const TASKS_MD: &str = "tasks.md";
pub const CONTEXT_MD: &str = "context.md";
pub const SKILL_MD: &str = "SKILL.md";

/// Extension of the source files scanned for object declarations.
pub const AL_EXTENSION: &str = "al";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn active_tasks_dir(root: &Path) -> PathBuf {
    root.join(ACTIVE_TASKS_DIR)
}

pub fn rules_path(root: &Path) -> PathBuf {
    root.join(RULES_FILE)
}

pub fn tasks_md(task_folder: &Path) -> PathBuf {
    task_folder.join(TASKS_MD)
}

pub fn context_md(task_folder: &Path) -> PathBuf {
    task_folder.join(CONTEXT_MD)
}

/// Documentation entry point for a skill, as shown in the activation directive.
pub fn skill_doc(skills_path: &str, name: &str) -> String {
    format!("{}/{name}/{SKILL_MD}", skills_path.trim_end_matches(['/', '\\']))
}

pub fn is_al_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == AL_EXTENSION)
}

/// Final path component for display, falling back to the full path.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
