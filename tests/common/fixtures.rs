//! Sample documents shared by the integration tests.

pub const CONFIGURATION: &str =
    "<configuration><database><host>localhost</host><port>5432</port></database></configuration>";

pub const ARTICLE: &str = r#"<article id="a1">
    <title>Formatting   rules</title>
    <p>Text with <em>emphasis</em> and <code>code</code>.</p>
    <!-- a note -->
    <section class="body" data-x="1">
        <p>   Second
           paragraph </p>
        <pre>  keep
    this </pre>
    </section>
</article>"#;

pub const PAGE: &str = r#"<html>
  <head><title>Page</title><meta charset="utf-8"/></head>
  <body>
    <div class="card" style="color: red; margin: 0; padding: 1px; border: none">
      <p>Hello <b>there</b>,<br/> <a href="/x">friend</a>!</p>
      <input type="checkbox" checked="checked" disabled=""/>
    </div>
    <pre>
  indented
    more</pre>
  </body>
</html>"#;
