//! The static category hierarchy shown in the left pane.
//!
//! Categories are configuration, not data: the table below is fixed at
//! compile time and only the library root is supplied at runtime.  Building
//! the tree never touches the disk.

use std::path::{Path, PathBuf};

/// One row of the compile-time category table.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub name: &'static str,
    pub children: &'static [&'static str],
}

/// Name of the top-level category that maps to the library root itself.
pub const ALL: &str = "All";

/// The catalog layout, in display order.
pub const CATALOG: &[CategorySpec] = &[
    CategorySpec { name: ALL, children: &[] },
    CategorySpec { name: "Items", children: &[] },
    CategorySpec {
        name: "Characters",
        children: &[
            "Koloboks", "Animals", "Viruses", "Fido", "Aliens", "Draft", "Others",
        ],
    },
    CategorySpec { name: "Transport", children: &[] },
    CategorySpec {
        name: "Locations",
        children: &[
            "Alien Planet",
            "Antivirus Planet",
            "City Planet",
            "Fido Planet",
            "Homepage Oracle",
            "Kolobanga",
            "New Year",
            "SocialNet",
            "Valley",
            "Wiki",
        ],
    },
    CategorySpec { name: "Buildings", children: &[] },
    CategorySpec { name: "Objects", children: &[] },
    CategorySpec { name: "Others", children: &[] },
];

/// A category node with its resolved absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub path: PathBuf,
    pub children: Vec<Category>,
}

impl Category {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Resolve the whole [`CATALOG`] against `root`.
///
/// Top-level nodes map to `root/<name>` (`All` maps to `root`), children to
/// `root/<parent>/<child>` with spaces in the child name replaced by
/// underscores.
pub fn build_categories(root: &Path) -> Vec<Category> {
    CATALOG
        .iter()
        .map(|spec| {
            let path = if spec.name == ALL {
                root.to_path_buf()
            } else {
                root.join(spec.name)
            };
            let children = spec
                .children
                .iter()
                .map(|child| Category {
                    name: (*child).to_string(),
                    path: path.join(child_dir_name(child)),
                    children: Vec::new(),
                })
                .collect();
            Category {
                name: spec.name.to_string(),
                path,
                children,
            }
        })
        .collect()
}

fn child_dir_name(name: &str) -> String {
    name.replace(' ', "_")
}
