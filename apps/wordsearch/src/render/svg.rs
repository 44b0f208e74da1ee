//! Minimal SVG document model.
//!
//! Pages are built as a tree of `Element`s so layout can be inspected in tests, then
//! serialized once with `Display`. Only the shapes the puzzle pages need exist here.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    None,
    Named(&'static str),
    Rgb(Rgb),
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::None => write!(f, "none"),
            Paint::Named(name) => write!(f, "{name}"),
            Paint::Rgb(Rgb(r, g, b)) => write!(f, "rgb({r},{g},{b})"),
        }
    }
}

pub const BLACK: Paint = Paint::Named("black");
pub const RED: Paint = Paint::Named("red");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: Option<i64>,
}

impl Stroke {
    pub const NONE: Stroke = Stroke {
        paint: Paint::None,
        width: None,
    };

    pub fn thin(paint: Paint) -> Self {
        Self { paint, width: None }
    }

    pub fn wide(paint: Paint, width: i64) -> Self {
        Self {
            paint,
            width: Some(width),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        fill: Paint,
        stroke: Stroke,
    },
    Circle {
        cx: i64,
        cy: i64,
        r: i64,
        fill: Paint,
        stroke: Stroke,
    },
    /// Text centered on `(x, y)` both horizontally and vertically.
    Text {
        x: i64,
        y: i64,
        content: String,
        font_size: u32,
    },
    Group(Vec<Element>),
}

impl Element {
    pub fn outline_rect(x: i64, y: i64, width: i64, height: i64, stroke: Stroke) -> Self {
        Element::Rect {
            x,
            y,
            width,
            height,
            fill: Paint::None,
            stroke,
        }
    }

    pub fn filled_rect(x: i64, y: i64, width: i64, height: i64, fill: Paint) -> Self {
        Element::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke: Stroke::NONE,
        }
    }

    pub fn outline_circle(cx: i64, cy: i64, r: i64, stroke: Stroke) -> Self {
        Element::Circle {
            cx,
            cy,
            r,
            fill: Paint::None,
            stroke,
        }
    }

    pub fn text(x: i64, y: i64, content: impl Into<String>, font_size: u32) -> Self {
        Element::Text {
            x,
            y,
            content: content.into(),
            font_size,
        }
    }

    fn write_svg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                write!(
                    f,
                    r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{fill}""#
                )?;
                write_stroke(f, stroke)?;
                f.write_str("/>")
            }
            Element::Circle {
                cx,
                cy,
                r,
                fill,
                stroke,
            } => {
                write!(f, r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}""#)?;
                write_stroke(f, stroke)?;
                f.write_str("/>")
            }
            Element::Text {
                x,
                y,
                content,
                font_size,
            } => write!(
                f,
                r#"<text x="{x}" y="{y}" text-anchor="middle" alignment-baseline="central" font-size="{font_size}" fill="black">{}</text>"#,
                escape(content)
            ),
            Element::Group(children) => {
                f.write_str("<g>")?;
                for child in children {
                    child.write_svg(f)?;
                }
                f.write_str("</g>")
            }
        }
    }
}

fn write_stroke(f: &mut fmt::Formatter<'_>, stroke: &Stroke) -> fmt::Result {
    write!(f, r#" stroke="{}""#, stroke.paint)?;
    if let Some(width) = stroke.width {
        write!(f, r#" stroke-width="{width}""#)?;
    }
    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// A fixed-size vector page.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: i64,
    pub height: i64,
    elements: Vec<Element>,
}

impl SvgDocument {
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// All elements in paint order, with groups expanded.
    #[cfg(test)]
    pub fn flatten(&self) -> Vec<&Element> {
        fn walk<'a>(elements: &'a [Element], out: &mut Vec<&'a Element>) {
            for element in elements {
                match element {
                    Element::Group(children) => walk(children, out),
                    other => out.push(other),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.elements, &mut out);
        out
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="utf-8" ?>"#)?;
        write!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" baseProfile="full" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        for element in &self.elements {
            element.write_svg(f)?;
        }
        f.write_str("</svg>")
    }
}
