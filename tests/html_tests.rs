mod common;

use common::fixtures::PAGE;
use common::{TestResult, format_twice, format_with};
use markfmt::{FormatError, MarkfmtError, format_html_str, format_str, presets};

#[test]
fn test_page_renders_as_html5() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let output = format_with(presets::html5(), PAGE)?;
    assert_eq!(
        output,
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>Page</title>
    <meta charset="utf-8">
  </head>
  <body>
    <div class="card" style="color: red; margin: 0; padding: 1px; border: none">
      <p>Hello <b>there</b>,<br> <a href="/x">friend</a>!</p>
      <input type="checkbox" checked disabled>
    </div>
    <pre>
  indented
    more</pre>
  </body>
</html>"#
    );
    Ok(())
}

#[test]
fn test_void_elements_never_close() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let output = format_with(presets::html5(), PAGE)?;
    for closing in ["</meta>", "</br>", "</input>", "/>"] {
        assert!(!output.contains(closing), "found {} in {}", closing, output);
    }
    Ok(())
}

#[test]
fn test_xhtml_keeps_attribute_values_and_self_closes() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let output = format_with(presets::xhtml(), PAGE)?;
    assert!(output.contains(r#"<input type="checkbox" checked="checked" disabled="" />"#));
    assert!(output.contains(r#"<meta charset="utf-8" />"#));
    assert!(output.starts_with("<html>"));
    Ok(())
}

#[test]
fn test_void_names_compare_case_insensitively() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let output = format_with(presets::html5(), "<DIV><BR/><HR/></DIV>")?;
    assert_eq!(output, "<!DOCTYPE html>\n<DIV><BR>\n  <HR>\n</DIV>");
    Ok(())
}

#[test]
fn test_void_element_with_content_fails() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let result = format_with(presets::html5(), "<p><br>x</br></p>");
    assert!(matches!(
        result,
        Err(MarkfmtError::Format(FormatError::VoidElementWithContent(name))) if name == "br"
    ));
    Ok(())
}

#[test]
fn test_doctype_sources() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let kept = format_with(presets::html5(), "<!DOCTYPE html><html/>")?;
    assert_eq!(kept, "<!DOCTYPE html>\n<html></html>");

    let from_document = format_with(presets::xml(), r#"<!DOCTYPE note SYSTEM "note.dtd"><note/>"#)?;
    assert_eq!(from_document, "<!DOCTYPE note SYSTEM \"note.dtd\">\n<note />");

    let overridden = format_with(
        presets::xml().with_doctype(r#"<!DOCTYPE memo SYSTEM "memo.dtd">"#),
        r#"<!DOCTYPE note SYSTEM "note.dtd"><note/>"#,
    )?;
    assert_eq!(overridden, "<!DOCTYPE memo SYSTEM \"memo.dtd\">\n<note />");
    Ok(())
}

#[test]
fn test_html5_output_reads_back_unchanged() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let formatter = presets::html5().build()?;
    for input in [PAGE, r#"<div><img src="a.png"/><p>x</p></div>"#] {
        let (once, twice) = format_twice(&formatter, input)?;
        assert_eq!(once, twice);
    }
    Ok(())
}

#[test]
fn test_html5_input_gets_implied_structure() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let formatter = presets::html5().build()?;
    let output = format_html_str("<title>T</title><p>one<p>two", &formatter)?;
    assert_eq!(
        output,
        "<!DOCTYPE html>\n<html>\n  <head>\n    <title>T</title>\n  </head>\n  <body>\n    <p>one</p>\n    <p>two</p>\n  </body>\n</html>"
    );
    Ok(())
}

#[test]
fn test_reader_follows_the_flavor() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    // Unclosed void tags are fine for the HTML reader and malformed for the XML reader.
    let input = "<div><br><hr></div>";
    let html = format_str(input, &presets::html5().build()?)?;
    assert!(html.contains("<div><br>\n"), "{}", html);
    assert!(matches!(
        format_str(input, &presets::xhtml().build()?),
        Err(MarkfmtError::Parse(_))
    ));
    Ok(())
}
