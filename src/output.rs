//! Output file naming.

use std::path::{Path, PathBuf};

use crate::config::GeneralOutputLayout;
use crate::error::{LingoError, Result};

pub const BLOG_DIR: &str = "Blog";
pub const NON_BLOG_DIR: &str = "Non-Blog";
pub const TRANSLATED_SUFFIX: &str = "_translated";

fn split_name(input: &Path) -> Result<(String, String)> {
    let stem = input
        .file_stem()
        .ok_or_else(|| LingoError::Config(format!("Invalid input filename: {}", input.display())))?
        .to_string_lossy()
        .to_string();
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "json".to_string());
    Ok((stem, extension))
}

fn base_dir(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    }
}

/// Combined general-mode output, e.g. `page_translated.json` or `Non-Blog/page_translated.json`.
pub fn general_output_path(
    input: &Path,
    output_dir: Option<&Path>,
    layout: GeneralOutputLayout,
) -> Result<PathBuf> {
    let (stem, extension) = split_name(input)?;
    let dir = base_dir(input, output_dir);
    let file_name = format!("{}{}.{}", stem, TRANSLATED_SUFFIX, extension);
    Ok(match layout {
        GeneralOutputLayout::Sibling => dir.join(file_name),
        GeneralOutputLayout::NonBlogFolder => dir.join(NON_BLOG_DIR).join(file_name),
    })
}

/// Per-language blog output, e.g. `Blog/fr_post.json`.
pub fn blog_output_path(input: &Path, output_dir: Option<&Path>, target_lang: &str) -> Result<PathBuf> {
    let (stem, extension) = split_name(input)?;
    Ok(base_dir(input, output_dir)
        .join(BLOG_DIR)
        .join(format!("{}_{}.{}", target_lang, stem, extension)))
}

/// True for files this tool wrote itself; batch runs skip them.
pub fn is_generated_output(path: &Path, root: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let in_output_dir = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .any(|c| c.as_os_str() == BLOG_DIR || c.as_os_str() == NON_BLOG_DIR);
    let translated_name = path
        .file_stem()
        .is_some_and(|stem| stem.to_string_lossy().ends_with(TRANSLATED_SUFFIX));
    in_output_dir || translated_name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_layouts() {
        let input = Path::new("content/page.json");
        assert_eq!(
            general_output_path(input, None, GeneralOutputLayout::Sibling).unwrap(),
            PathBuf::from("content/page_translated.json")
        );
        assert_eq!(
            general_output_path(input, None, GeneralOutputLayout::NonBlogFolder).unwrap(),
            PathBuf::from("content/Non-Blog/page_translated.json")
        );
        assert_eq!(
            general_output_path(input, Some(Path::new("out")), GeneralOutputLayout::Sibling).unwrap(),
            PathBuf::from("out/page_translated.json")
        );
    }

    #[test]
    fn blog_files_are_prefixed_with_language() {
        assert_eq!(
            blog_output_path(Path::new("posts/launch.json"), None, "fr").unwrap(),
            PathBuf::from("posts/Blog/fr_launch.json")
        );
        assert_eq!(
            blog_output_path(Path::new("launch.json"), None, "ar").unwrap(),
            PathBuf::from("Blog/ar_launch.json")
        );
    }

    #[test]
    fn recognises_generated_files() {
        let root = Path::new("site");
        assert!(is_generated_output(Path::new("site/Blog/fr_post.json"), root));
        assert!(is_generated_output(Path::new("site/a/Non-Blog/page_translated.json"), root));
        assert!(is_generated_output(Path::new("site/page_translated.json"), root));
        assert!(!is_generated_output(Path::new("site/page.json"), root));
        assert!(!is_generated_output(Path::new("site/Blogroll/page.json"), root));
    }
}
