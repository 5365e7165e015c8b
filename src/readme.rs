//! Deterministic README assembly.
//!
//! Pure string rendering: the same `(repo_name, docs)` input always produces
//! byte-identical output. Only the narrative text inside each entry varies
//! across requests, and that variation comes from the generator upstream,
//! never from this module.

use crate::models::FileDoc;

/// Render the full README for a repository from its per-file documentation
/// records, in the given order.
///
/// Section order is fixed: title, overview, features, project structure
/// (one subsection per entry), getting started, generation info, license.
/// An empty `docs` slice still yields every fixed section.
pub fn build_readme(repo_name: &str, docs: &[FileDoc]) -> String {
    let mut sections = Vec::new();

    sections.push(format!("# {}\n", repo_name));

    sections.push(
        "## 📖 Overview\n\
         This repository contains source code organized into multiple modules. \
         The documentation below provides a structured overview of the codebase, \
         including file responsibilities, functions, and classes. \
         This README was automatically generated using an AI-powered documentation tool.\n"
            .to_string(),
    );

    sections.push(
        "## ✨ Features\n\
         - Automated documentation from source code\n\
         - File-level explanations\n\
         - Function and class summaries\n\
         - AI-assisted analysis\n"
            .to_string(),
    );

    sections.push("## 🧩 Project Structure\n".to_string());

    for doc in docs {
        sections.push(format!("### 📄 `{}`\n", doc.file));
        sections.push(format!("{}\n", doc.documentation.trim()));

        if !doc.functions.is_empty() {
            sections.push("**Functions:**\n".to_string());
            for function in &doc.functions {
                sections.push(format!("- `{}`\n", function));
            }
        }

        if !doc.classes.is_empty() {
            sections.push("\n**Classes:**\n".to_string());
            for class in &doc.classes {
                sections.push(format!("- `{}`\n", class));
            }
        }

        sections.push("\n---\n".to_string());
    }

    sections.push(
        "## 🚀 Getting Started\n\
         ### Prerequisites\n\
         - Git\n\
         - Node.js / Python (depending on the project)\n\
         \n\
         ### Installation\n\
         ```bash\n\
         git clone <repository-url>\n\
         cd <repository-name>\n\
         ```\n"
            .to_string(),
    );

    sections.push(
        "## 🤖 Documentation Generation\n\
         This README was generated using an AI-Enhanced Documentation Generator. \
         The system analyzes repository structure and source code to produce \
         clear, human-readable documentation.\n"
            .to_string(),
    );

    sections.push(
        "## 📄 License\n\
         This project is licensed under the MIT License.\n"
            .to_string(),
    );

    sections.join("\n")
}

/// Render a README for a single inline file: the standard document shape
/// with the filename as title and exactly one structure entry.
pub fn build_single_file_readme(filename: &str, doc: &FileDoc) -> String {
    build_readme(filename, std::slice::from_ref(doc))
}
