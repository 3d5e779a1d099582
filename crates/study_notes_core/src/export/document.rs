//! crates/study_notes_core/src/export/document.rs
//!
//! Lays a [`GeneratedNotes`] value out into fixed-size pages: a centered title
//! page followed by a flowing body. The result is a plain data model that the
//! PDF renderer draws and that tests can inspect directly.

use crate::domain::{GeneratedNotes, PracticeQuestion, QuestionType, TopicNote};
use crate::export::layout::{self, PageBounds, CONTENT_WIDTH, MARGIN, PAGE_WIDTH};
use crate::export::text::option_letter;

pub use crate::export::layout::Font;

pub const PRODUCT_NAME: &str = "STUDY BUDDY";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
}

impl TextStyle {
    pub const TITLE: TextStyle = TextStyle { font: Font::Bold, size: 22.0 };
    pub const SUBTITLE: TextStyle = TextStyle { font: Font::Bold, size: 16.0 };
    pub const CHAPTER: TextStyle = TextStyle { font: Font::Bold, size: 18.0 };
    pub const HEADING: TextStyle = TextStyle { font: Font::Bold, size: 14.0 };
    pub const SUBHEADING: TextStyle = TextStyle { font: Font::Bold, size: 11.0 };
    pub const LABEL: TextStyle = TextStyle { font: Font::Bold, size: 10.0 };
    pub const BODY: TextStyle = TextStyle { font: Font::Regular, size: 11.0 };
    pub const DETAIL: TextStyle = TextStyle { font: Font::Regular, size: 10.0 };
    pub const OPTION: TextStyle = TextStyle { font: Font::Regular, size: 9.0 };
    pub const CODE: TextStyle = TextStyle { font: Font::Mono, size: 9.0 };

    fn wrap(self, text: &str) -> Vec<String> {
        layout::wrap(text, self.font, self.size, CONTENT_WIDTH)
    }

    fn width(self, text: &str) -> f32 {
        layout::text_width(text, self.font, self.size)
    }
}

/// One line of text at a fixed position. `baseline` is measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    /// Every line of every page, in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

//=========================================================================================
// Composition
//=========================================================================================

struct Composer {
    pages: Vec<Page>,
    offset: f32,
    bounds: PageBounds,
}

impl Composer {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            offset: 0.0,
            bounds: PageBounds::default(),
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.offset = self.bounds.top;
    }

    fn current(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.new_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Wraps `text` to the content width and places it as one block.
    /// Blocks taller than a whole page are placed line by line instead.
    fn push(&mut self, style: TextStyle, text: &str) {
        let lines = style.wrap(text);
        let line_height = layout::line_height(style.size);
        let block_height = lines.len() as f32 * line_height;

        if block_height > self.bounds.bottom - self.bounds.top {
            for line in lines {
                self.place(style, vec![line], line_height);
            }
        } else {
            self.place(style, lines, block_height);
        }
    }

    fn place(&mut self, style: TextStyle, lines: Vec<String>, block_height: f32) {
        let step = layout::advance(self.offset, block_height, self.bounds);
        if step.page_break {
            self.new_page();
        }
        let line_height = layout::line_height(style.size);
        let page = self.current();
        for (i, text) in lines.into_iter().enumerate() {
            page.lines.push(PlacedLine {
                text,
                x: MARGIN,
                baseline: step.start + i as f32 * line_height + style.size,
                style,
            });
        }
        self.offset = step.next;
    }

    fn centered(&mut self, style: TextStyle, text: &str, baseline: f32) {
        let line_height = layout::line_height(style.size);
        let page = self.current();
        for (i, line) in style.wrap(text).into_iter().enumerate() {
            let width = style.width(&line);
            page.lines.push(PlacedLine {
                x: ((PAGE_WIDTH - width) / 2.0).max(MARGIN),
                baseline: baseline + i as f32 * line_height,
                text: line,
                style,
            });
        }
    }
}

/// Lays out the title page and one body section per chapter.
/// Each chapter after the first starts on a fresh page.
pub fn compose(notes: &GeneratedNotes) -> Document {
    let mut composer = Composer::new();

    composer.new_page();
    composer.centered(TextStyle::TITLE, PRODUCT_NAME, 283.0);
    let level = match &notes.sub_level {
        Some(sub) => format!("{} LEVEL NOTES ({})", notes.domain.label().to_uppercase(), sub),
        None => format!("{} LEVEL NOTES", notes.domain.label().to_uppercase()),
    };
    composer.centered(TextStyle::SUBTITLE, &level, 326.0);
    composer.centered(
        TextStyle::BODY,
        &format!("Topics: {}", notes.topics.join(", ")),
        368.0,
    );

    composer.new_page();
    for (index, note) in notes.notes.iter().enumerate() {
        if index > 0 {
            composer.new_page();
        }
        compose_chapter(&mut composer, index, note);
    }

    Document {
        pages: composer.pages,
    }
}

fn compose_chapter(c: &mut Composer, index: usize, note: &TopicNote) {
    c.push(TextStyle::CHAPTER, &format!("Chapter {}: {}", index + 1, note.title));
    c.push(TextStyle::HEADING, "Introduction");
    c.push(TextStyle::BODY, &note.introduction);

    c.push(TextStyle::HEADING, "Key Definitions");
    for d in &note.definitions {
        c.push(TextStyle::DETAIL, &format!("{}: {}", d.term, d.definition));
    }

    for s in &note.sections {
        c.push(TextStyle::HEADING, &s.heading);
        c.push(TextStyle::BODY, &s.content);
    }

    c.push(TextStyle::HEADING, "Examples & Explanations");
    for (i, e) in note.examples.iter().enumerate() {
        c.push(TextStyle::SUBHEADING, &format!("Example {}: {}", i + 1, e.title));
        if let Some(code) = &e.code {
            c.push(TextStyle::LABEL, "Code:");
            c.push(TextStyle::CODE, code);
        }
        c.push(TextStyle::LABEL, "Explanation:");
        c.push(TextStyle::DETAIL, &e.explanation);
    }

    if let Some(diagram) = &note.diagram_description {
        c.push(TextStyle::HEADING, "Diagram Description");
        c.push(TextStyle::DETAIL, diagram);
    }

    c.push(TextStyle::HEADING, "Summary");
    c.push(TextStyle::BODY, &note.summary);

    c.push(TextStyle::HEADING, "Practice Questions");
    for (i, q) in note.practice_questions.iter().enumerate() {
        compose_question(c, i, q);
    }
}

fn compose_question(c: &mut Composer, index: usize, q: &PracticeQuestion) {
    c.push(
        TextStyle::DETAIL,
        &format!("{}. [{}] {}", index + 1, q.kind.as_str().to_uppercase(), q.question),
    );
    if let Some(options) = &q.options {
        for (i, opt) in options.iter().enumerate() {
            c.push(TextStyle::OPTION, &format!("   {}) {}", option_letter(i), opt));
        }
    }
    if let Some(answer) = &q.correct_answer {
        c.push(TextStyle::OPTION, &format!("   Correct Answer: {}", answer));
    }
    if let Some(code) = &q.starter_code {
        c.push(TextStyle::LABEL, "Starter Code:");
        c.push(TextStyle::CODE, code);
    }
    if let Some(solution) = &q.solution {
        c.push(TextStyle::LABEL, "Solution:");
        let style = if q.kind == QuestionType::Coding {
            TextStyle::CODE
        } else {
            TextStyle::DETAIL
        };
        c.push(style, solution);
    }
}
