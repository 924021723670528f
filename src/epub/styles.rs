//! Built-in stylesheet shared by every chapter.

/// Reflowable defaults that read well on small e-ink screens as well as in
/// browser-based readers.
pub const DEFAULT_STYLESHEET: &str = r#"/* Base styles */
body {
  margin: 0 5%;
  font-family: serif;
  line-height: 1.5;
  text-align: justify;
  hyphens: auto;
}

h1, h2, h3, h4, h5, h6 {
  font-family: sans-serif;
  line-height: 1.2;
  text-align: left;
  page-break-after: avoid;
}

h1.chapter-title {
  margin: 2em 0 1em 0;
  font-size: 1.6em;
}

h2.placeholder {
  margin-top: 3em;
  color: #777777;
  font-style: italic;
  text-align: center;
}

p {
  margin: 0 0 0.8em 0;
}

img {
  max-width: 100%;
  height: auto;
}

blockquote {
  margin: 1em 2em;
  font-style: italic;
}

pre, code {
  font-family: monospace;
  font-size: 0.9em;
}

pre {
  white-space: pre-wrap;
  margin: 1em 0;
}

table {
  border-collapse: collapse;
  margin: 1em 0;
}

th, td {
  border: 1px solid #999999;
  padding: 0.2em 0.5em;
}

hr {
  border: none;
  border-top: 1px solid #999999;
  margin: 1.5em 20%;
}
"#;
