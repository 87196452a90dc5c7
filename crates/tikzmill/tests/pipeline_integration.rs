//! End-to-end pipeline tests: source tree on disk in, figures out.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tikzmill::{Document, ExtractWarningCode, MacroEngine, MacroError, TexError, TikzFigure};

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

const MAIN: &str = "\\documentclass{article}\n\
    \\usepackage{tikz}\n\
    \\usepackage{booktabs}\n\
    \\definecolor{navy}{RGB}{0,0,96}\n\
    \\colorlet{fg}{navy!50}\n\
    \\newcommand{\\ours}{TikzMill}\n\
    \\begin{document}\n\
    Intro text.\n\
    \\input{fig}\n\
    \\end{document}\n";

const FIG: &str = "\\begin{figure}\n\
    \\centering\n\
    \\begin{tikzpicture}\n\
    \\draw[fg] (0,0) -- (1,1);\n\
    \\end{tikzpicture}\n\
    \\caption{Accuracy of \\ours{} over time.\\label{fig:acc}}\n\
    \\end{figure}\n";

fn fixture() -> (TempDir, Vec<TikzFigure>) {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "main.tex", MAIN);
    write(tmp.path(), "fig.tex", FIG);
    let doc = Document::open(tmp.path().join("main.tex")).unwrap();
    let figures = doc.figures().collect();
    (tmp, figures)
}

#[test]
fn pipeline_extracts_one_figure() {
    let (_tmp, figures) = fixture();
    assert_eq!(figures.len(), 1);
}

#[test]
fn code_is_a_standalone_document() {
    let (_tmp, figures) = fixture();
    let code = &figures[0].code;
    assert!(code.starts_with("\\documentclass{article}"));
    assert!(code.contains("\\usepackage{tikz}"));
    assert!(code.contains("\\begin{document}"));
    assert!(code.contains("\\begin{tikzpicture}"));
    assert!(code.contains("\\end{tikzpicture}"));
    assert!(code.ends_with("\\end{document}"));
}

#[test]
fn colors_carried_transitively_into_code() {
    let (_tmp, figures) = fixture();
    let code = &figures[0].code;
    // the diagram names only fg; navy rides along through the alias
    assert!(code.contains("\\colorlet{fg}{navy!50}"));
    assert!(code.contains("\\definecolor{navy}{RGB}{0,0,96}"));
}

#[test]
fn uncommon_package_left_out_of_code() {
    let (_tmp, figures) = fixture();
    assert!(!figures[0].code.contains("booktabs"));
}

#[test]
fn caption_is_cleaned() {
    let (_tmp, figures) = fixture();
    assert_eq!(figures[0].caption, "Accuracy of TikzMill over time.");
}

#[test]
fn preamble_text_body_accessible() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "main.tex", MAIN);
    write(tmp.path(), "fig.tex", FIG);
    let doc = Document::open(tmp.path().join("main.tex")).unwrap();
    assert!(doc.text().contains("Intro text."));
    assert!(doc.preamble().imports.contains("\\usepackage{tikz}"));
    assert!(doc.preamble().macros.contains("\\newcommand{\\ours}"));
}

#[test]
fn missing_documentclass_rejects_document() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "main.tex",
        "\\begin{document}x\\end{document}\n",
    );
    let err = Document::open(tmp.path().join("main.tex")).unwrap_err();
    assert_eq!(
        err,
        TexError::MissingStructure("\\documentclass".to_string())
    );
}

#[test]
fn truncated_document_rejected() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "main.tex",
        "\\documentclass{article}\n\\begin{document}\nno end marker\n",
    );
    let err = Document::open(tmp.path().join("main.tex")).unwrap_err();
    assert_eq!(
        err,
        TexError::MissingStructure("\\end{document}".to_string())
    );
}

#[test]
fn broken_include_still_extracts_other_figures() {
    let tmp = TempDir::new().unwrap();
    let main = MAIN.replace("\\input{fig}", "\\input{gone}\n\\input{fig}");
    write(tmp.path(), "main.tex", &main);
    write(tmp.path(), "fig.tex", FIG);
    let doc = Document::open(tmp.path().join("main.tex")).unwrap();
    assert_eq!(doc.figures().count(), 1);
    assert!(
        doc.warnings()
            .iter()
            .any(|w| w.code == ExtractWarningCode::UnreadableInclude)
    );
}

#[test]
fn multi_tikz_figure_skipped_single_kept() {
    let tmp = TempDir::new().unwrap();
    let two = "\\begin{figure}\n\
        \\begin{tikzpicture}a\\end{tikzpicture}\n\
        \\begin{tikzpicture}b\\end{tikzpicture}\n\
        \\caption{Two}\n\
        \\end{figure}\n";
    let main = format!(
        "\\documentclass{{article}}\n\\usepackage{{tikz}}\n\\begin{{document}}\n{two}{FIG}\\end{{document}}\n"
    );
    write(tmp.path(), "main.tex", &main);
    let doc = Document::open(tmp.path().join("main.tex")).unwrap();
    let figures: Vec<_> = doc.figures().collect();
    assert_eq!(figures.len(), 1);
    assert!(figures[0].code.contains("(0,0) -- (1,1)"));
}

#[test]
fn failing_macro_engine_degrades_with_warning() {
    struct FailingEngine;
    impl MacroEngine for FailingEngine {
        fn find_used(&self, _: &str, _: &str) -> Result<Vec<String>, MacroError> {
            Err(MacroError::Other("down".to_string()))
        }
        fn expand(&self, _: &str, _: &str) -> Result<String, MacroError> {
            Err(MacroError::Other("down".to_string()))
        }
    }

    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "main.tex", MAIN);
    write(tmp.path(), "fig.tex", FIG);
    let doc =
        Document::open_with_engine(tmp.path().join("main.tex"), Box::new(FailingEngine)).unwrap();

    let mut figures = doc.figures();
    let extracted: Vec<_> = figures.by_ref().collect();
    assert_eq!(extracted.len(), 1);
    // caption falls back to the unexpanded text, labels still stripped
    assert_eq!(extracted[0].caption, "Accuracy of \\ours{} over time.");
    assert!(!extracted[0].code.contains("\\newcommand"));
    assert!(
        figures
            .warnings()
            .iter()
            .any(|w| w.code == ExtractWarningCode::MacroEngineFailure && w.figure == Some(0))
    );
}

#[test]
fn figures_iterator_is_restartable() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "main.tex", MAIN);
    write(tmp.path(), "fig.tex", FIG);
    let doc = Document::open(tmp.path().join("main.tex")).unwrap();
    assert_eq!(doc.figures().count(), doc.figures().count());
}

#[cfg(feature = "serde")]
#[test]
fn tikz_figure_serializes() {
    let (_tmp, figures) = fixture();
    let json = serde_json::to_string(&figures[0]).unwrap();
    let back: TikzFigure = serde_json::from_str(&json).unwrap();
    assert_eq!(back, figures[0]);
}
