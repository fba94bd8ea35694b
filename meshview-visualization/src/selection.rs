//! Screen-space point selection gestures

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Shape swept by a selection drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    #[default]
    Rectangle,
    Line,
}

/// Pixel rectangle; `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SelectionRect {
    /// Rectangle spanned by two drag corners in any order. The far edges are
    /// exclusive, so identical corners give an empty rectangle.
    pub fn from_corners(a: Point2<i32>, b: Point2<i32>) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);

        Self {
            x: left,
            y: top,
            width: a.x.max(b.x) - left,
            height: a.y.max(b.y) - top,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn top_left(&self) -> Point2<i32> {
        Point2::new(self.x, self.y)
    }

    /// Last pixel inside the rectangle
    pub fn bottom_right(&self) -> Point2<i32> {
        Point2::new(self.x + self.width - 1, self.y + self.height - 1)
    }

    pub fn contains(&self, pixel: Point2<i32>) -> bool {
        pixel.x >= self.x
            && pixel.y >= self.y
            && pixel.x < self.x + self.width
            && pixel.y < self.y + self.height
    }
}

/// Points to add to the renderer's selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionRequest {
    /// Every point projecting inside the rectangle
    Rect(SelectionRect),
    /// Points picked along the segment between two pixels
    Line { from: Point2<i32>, to: Point2<i32> },
}

/// What a finished selection drag asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Add(SelectionRequest),
    /// A click without movement clears the selection
    Clear,
    /// Nothing to do (no drag, or a rectangle with no area)
    Nothing,
}

/// Tracks a selection drag from press to release
#[derive(Debug, Clone, Default)]
pub struct SelectionTool {
    mode: SelectionMode,
    drag: Option<(Point2<i32>, Point2<i32>)>,
}

impl SelectionTool {
    pub fn new(mode: SelectionMode) -> Self {
        Self { mode, drag: None }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn begin(&mut self, pixel: Point2<i32>) {
        self.drag = Some((pixel, pixel));
    }

    /// Move the free end of the drag; ignored when not dragging
    pub fn update(&mut self, pixel: Point2<i32>) {
        if let Some((_, end)) = self.drag.as_mut() {
            *end = pixel;
        }
    }

    /// Rectangle currently spanned by the drag
    pub fn rect(&self) -> Option<SelectionRect> {
        self.drag.map(|(start, end)| SelectionRect::from_corners(start, end))
    }

    /// Shape to draw while dragging
    pub fn current_request(&self) -> Option<SelectionRequest> {
        let (start, end) = self.drag?;
        match self.mode {
            SelectionMode::Rectangle => {
                let rect = SelectionRect::from_corners(start, end);
                (!rect.is_empty()).then_some(SelectionRequest::Rect(rect))
            }
            SelectionMode::Line => Some(SelectionRequest::Line { from: start, to: end }),
        }
    }

    /// End the drag
    pub fn finish(&mut self) -> SelectionOutcome {
        let Some((start, end)) = self.drag.take() else {
            return SelectionOutcome::Nothing;
        };

        if start == end {
            return SelectionOutcome::Clear;
        }

        match self.mode {
            SelectionMode::Rectangle => {
                let rect = SelectionRect::from_corners(start, end);
                if rect.is_empty() {
                    SelectionOutcome::Nothing
                } else {
                    SelectionOutcome::Add(SelectionRequest::Rect(rect))
                }
            }
            SelectionMode::Line => SelectionOutcome::Add(SelectionRequest::Line { from: start, to: end }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_reversed_corners() {
        let rect = SelectionRect::from_corners(Point2::new(30, 40), Point2::new(10, 15));
        assert_eq!(
            rect,
            SelectionRect {
                x: 10,
                y: 15,
                width: 20,
                height: 25
            }
        );
        assert_eq!(rect.bottom_right(), Point2::new(29, 39));
        assert!(rect.contains(Point2::new(10, 15)));
        assert!(!rect.contains(Point2::new(30, 40)));
    }

    #[test]
    fn test_click_is_empty_and_clears() {
        let rect = SelectionRect::from_corners(Point2::new(5, 5), Point2::new(5, 5));
        assert!(rect.is_empty());

        let mut tool = SelectionTool::default();
        tool.begin(Point2::new(5, 5));
        assert_eq!(tool.finish(), SelectionOutcome::Clear);
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_rectangle_drag() {
        let mut tool = SelectionTool::new(SelectionMode::Rectangle);
        tool.begin(Point2::new(0, 0));
        tool.update(Point2::new(8, 6));

        assert_eq!(
            tool.finish(),
            SelectionOutcome::Add(SelectionRequest::Rect(SelectionRect {
                x: 0,
                y: 0,
                width: 8,
                height: 6
            }))
        );
    }

    #[test]
    fn test_flat_rectangle_does_nothing() {
        let mut tool = SelectionTool::new(SelectionMode::Rectangle);
        tool.begin(Point2::new(0, 3));
        tool.update(Point2::new(20, 3));

        assert!(tool.current_request().is_none());
        assert_eq!(tool.finish(), SelectionOutcome::Nothing);
    }

    #[test]
    fn test_line_keeps_direction() {
        let mut tool = SelectionTool::new(SelectionMode::Line);
        tool.begin(Point2::new(20, 3));
        tool.update(Point2::new(0, 3));

        let expected = SelectionRequest::Line {
            from: Point2::new(20, 3),
            to: Point2::new(0, 3),
        };
        assert_eq!(tool.current_request(), Some(expected));
        assert_eq!(tool.finish(), SelectionOutcome::Add(expected));
    }

    #[test]
    fn test_finish_without_drag() {
        let mut tool = SelectionTool::default();
        tool.update(Point2::new(1, 1));
        assert_eq!(tool.finish(), SelectionOutcome::Nothing);
    }
}
