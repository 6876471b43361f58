//! The editing session: two surfaces, the gesture pipeline, history, and
//! export.
//!
//! A session owns a committed canvas and a transient overlay of equal size.
//! Drag tools paint the canvas directly; shape and crop drags preview on the
//! overlay and only touch the canvas when the gesture ends. Every committed
//! change records a full-frame snapshot so undo can also reverse crops.

use image::RgbaImage;

use crate::codec::{self, EncodedImage, ExportFormat};
use crate::error::EditorResult;
use crate::font::FontLibrary;
use crate::geometry::{BoundingBox, Point, Viewport};
use crate::raster::{draw, text, Surface};
use crate::state::{SessionEvent, SessionPhase, StateMachine};

use super::history::{HistoryStack, Snapshot};
use super::tools::{EditorTools, ShapeMode, ToolKind, ToolOptions};

/// What a pipeline call did with the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The gesture is live and awaiting further updates.
    Started,
    /// Canvas pixels changed and a history snapshot was recorded.
    Committed,
    /// A crop region is staged and awaits confirmation.
    CropStaged,
    /// The gesture ended without changing the canvas.
    Discarded,
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    tool: ToolKind,
    anchor: Point,
    last: Point,
}

pub struct EditorSession {
    canvas: Surface,
    overlay: Surface,
    history: HistoryStack,
    tools: EditorTools,
    machine: StateMachine,
    gesture: Option<Gesture>,
    pending_crop: Option<BoundingBox>,
    fonts: FontLibrary,
}

impl EditorSession {
    /// Decodes `source` and fits it into the default viewport.
    pub fn open(source: &[u8]) -> EditorResult<Self> {
        Self::open_with(source, Viewport::default(), ToolOptions::default())
    }

    /// Decodes `source`, fits it into `viewport` preserving aspect ratio,
    /// and seeds the history with the fitted image.
    pub fn open_with(
        source: &[u8],
        viewport: Viewport,
        options: ToolOptions,
    ) -> EditorResult<Self> {
        let decoded = codec::decode_image(source)?;
        let fitted = codec::fit_to_viewport(&decoded, viewport);
        tracing::info!(
            source_width = decoded.width(),
            source_height = decoded.height(),
            width = fitted.width(),
            height = fitted.height(),
            "editing session opened"
        );

        let mut session = Self::from_image(fitted);
        session.tools = EditorTools::with_options(options);
        Ok(session)
    }

    /// Builds a session directly over decoded pixels, skipping the viewport
    /// fit. The image becomes the first history snapshot.
    pub fn from_image(image: RgbaImage) -> Self {
        let overlay = Surface::new(image.width(), image.height());
        let canvas = Surface::from_image(image);
        let mut history = HistoryStack::new();
        history.record(Snapshot::new(canvas.to_image()));

        Self {
            canvas,
            overlay,
            history,
            tools: EditorTools::new(),
            machine: StateMachine::new(),
            gesture: None,
            pending_crop: None,
            fonts: FontLibrary::new(),
        }
    }

    /// Switches the active tool. Leaving the crop tool while a region is
    /// staged abandons that region.
    pub fn select_tool(&mut self, tool: ToolKind) -> EditorResult<()> {
        if self.machine.state() == SessionPhase::CropPending && tool != ToolKind::Crop {
            self.machine.transition(SessionEvent::CancelCrop)?;
            self.discard_pending_crop();
        }
        self.tools.select_tool(tool);
        Ok(())
    }

    /// Starts a gesture for the active tool at `point`.
    ///
    /// Text places its content in this single call and returns to idle.
    /// A staged crop is abandoned the moment a new gesture begins.
    pub fn begin_action(&mut self, point: Point) -> EditorResult<ActionOutcome> {
        let tool = self.tools.active_tool();
        if tool == ToolKind::Text {
            return self.stamp_text(point);
        }

        let had_pending_crop = self.machine.state() == SessionPhase::CropPending;
        self.machine.transition(SessionEvent::BeginAction)?;
        if had_pending_crop {
            self.discard_pending_crop();
        }

        let point = self.clamp_to_canvas(point);
        let options = self.tools.options();
        match tool {
            ToolKind::Pen => {
                draw::paint_dab(
                    &mut self.canvas,
                    point,
                    options.stroke_width,
                    options.stroke_color,
                );
            }
            ToolKind::Eraser => draw::erase_dab(&mut self.canvas, point, options.stroke_width),
            // Shape and crop drags paint nothing until the first update.
            _ => {}
        }

        self.gesture = Some(Gesture {
            tool,
            anchor: point,
            last: point,
        });
        Ok(ActionOutcome::Started)
    }

    /// Extends the live gesture to `point`. Brush tools paint the segment
    /// since the last update; shape and crop drags redraw their preview.
    pub fn update_action(&mut self, point: Point) -> EditorResult<ActionOutcome> {
        self.machine.transition(SessionEvent::UpdateAction)?;
        let point = self.clamp_to_canvas(point);

        if let Some(gesture) = self.gesture {
            let options = self.tools.options();
            match gesture.tool {
                ToolKind::Pen => draw::paint_segment(
                    &mut self.canvas,
                    gesture.last,
                    point,
                    options.stroke_width,
                    options.stroke_color,
                ),
                ToolKind::Eraser => draw::erase_segment(
                    &mut self.canvas,
                    gesture.last,
                    point,
                    options.stroke_width,
                ),
                ToolKind::Rectangle => {
                    self.overlay.clear();
                    draw::preview_rectangle(
                        &mut self.overlay,
                        BoundingBox::from_corners(gesture.anchor, point),
                    );
                }
                ToolKind::Circle => {
                    self.overlay.clear();
                    draw::preview_ellipse(
                        &mut self.overlay,
                        BoundingBox::from_corners(gesture.anchor, point),
                    );
                }
                ToolKind::Crop => {
                    self.overlay.clear();
                    draw::preview_crop(
                        &mut self.overlay,
                        BoundingBox::from_corners(gesture.anchor, point),
                    );
                }
                ToolKind::Text => {}
            }
        }
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.last = point;
        }
        Ok(ActionOutcome::Started)
    }

    /// Ends the live gesture at `point`. Brush strokes and shapes commit,
    /// a large-enough crop region is staged, everything else is discarded.
    pub fn end_action(&mut self, point: Point) -> EditorResult<ActionOutcome> {
        let Some(gesture) = self.gesture.take() else {
            // No live gesture, so the machine is not in Acting and the
            // transition below reports the phase error.
            self.machine.transition(SessionEvent::FinishAction)?;
            return Ok(ActionOutcome::Discarded);
        };

        let point = self.clamp_to_canvas(point);
        match gesture.tool {
            ToolKind::Pen => {
                let options = self.tools.options();
                draw::paint_segment(
                    &mut self.canvas,
                    gesture.last,
                    point,
                    options.stroke_width,
                    options.stroke_color,
                );
                self.machine.transition(SessionEvent::FinishAction)?;
                self.commit_snapshot("pen stroke");
                Ok(ActionOutcome::Committed)
            }
            ToolKind::Eraser => {
                let width = self.tools.options().stroke_width;
                draw::erase_segment(&mut self.canvas, gesture.last, point, width);
                self.machine.transition(SessionEvent::FinishAction)?;
                self.commit_snapshot("eraser stroke");
                Ok(ActionOutcome::Committed)
            }
            ToolKind::Rectangle | ToolKind::Circle => {
                self.overlay.clear();
                let bounds = BoundingBox::from_corners(gesture.anchor, point);
                let options = self.tools.options();
                match gesture.tool {
                    ToolKind::Rectangle => {
                        if options.shape_mode == ShapeMode::Fill {
                            draw::fill_rectangle(&mut self.canvas, bounds, options.fill_color);
                        }
                        draw::stroke_rectangle(
                            &mut self.canvas,
                            bounds,
                            options.stroke_width,
                            options.stroke_color,
                        );
                    }
                    _ => {
                        if options.shape_mode == ShapeMode::Fill {
                            draw::fill_ellipse(&mut self.canvas, bounds, options.fill_color);
                        }
                        draw::stroke_ellipse(
                            &mut self.canvas,
                            bounds,
                            options.stroke_width,
                            options.stroke_color,
                        );
                    }
                }
                self.machine.transition(SessionEvent::FinishAction)?;
                let label = if gesture.tool == ToolKind::Rectangle {
                    "rectangle"
                } else {
                    "circle"
                };
                self.commit_snapshot(label);
                Ok(ActionOutcome::Committed)
            }
            ToolKind::Crop => {
                let bounds = BoundingBox::from_corners(gesture.anchor, point);
                if bounds.is_degenerate() {
                    self.machine.transition(SessionEvent::FinishAction)?;
                    self.overlay.clear();
                    tracing::debug!(
                        width = bounds.width,
                        height = bounds.height,
                        "crop region under one pixel, discarded"
                    );
                    return Ok(ActionOutcome::Discarded);
                }
                self.machine.transition(SessionEvent::StageCrop)?;
                self.overlay.clear();
                draw::preview_crop(&mut self.overlay, bounds);
                self.pending_crop = Some(bounds);
                Ok(ActionOutcome::CropStaged)
            }
            ToolKind::Text => {
                // Text commits inside begin_action; no live gesture exists.
                self.machine.transition(SessionEvent::FinishAction)?;
                Ok(ActionOutcome::Discarded)
            }
        }
    }

    /// Applies the staged crop: the canvas and overlay shrink to the staged
    /// region and the result is committed to history.
    pub fn apply_crop(&mut self) -> EditorResult<ActionOutcome> {
        self.machine.transition(SessionEvent::ConfirmCrop)?;
        // The CropPending phase always carries a staged region.
        let Some(bounds) = self.pending_crop.take() else {
            self.overlay.clear();
            return Ok(ActionOutcome::Discarded);
        };
        // Staged bounds come from clamped gesture points, so the region
        // always sits inside the canvas.
        let Some(region) = self.canvas.extract(bounds) else {
            self.overlay.clear();
            return Ok(ActionOutcome::Discarded);
        };

        self.restore_canvas(region);
        self.commit_snapshot("crop");
        tracing::info!(
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            "canvas cropped"
        );
        Ok(ActionOutcome::Committed)
    }

    /// Abandons the staged crop, leaving the canvas untouched.
    pub fn cancel_crop(&mut self) -> EditorResult<ActionOutcome> {
        self.machine.transition(SessionEvent::CancelCrop)?;
        self.discard_pending_crop();
        Ok(ActionOutcome::Discarded)
    }

    /// Steps back one committed state. Returns whether anything changed.
    pub fn undo(&mut self) -> EditorResult<bool> {
        let had_pending_crop = self.machine.state() == SessionPhase::CropPending;
        self.machine.transition(SessionEvent::Undo)?;
        if had_pending_crop {
            self.discard_pending_crop();
        }

        let restored = self.history.undo().map(|snapshot| snapshot.image().clone());
        match restored {
            Some(image) => {
                self.restore_canvas(image);
                tracing::debug!(depth = self.history.len(), "undo applied");
                Ok(true)
            }
            None => {
                tracing::debug!("undo refused at the oldest state");
                Ok(false)
            }
        }
    }

    /// Steps forward one committed state. Returns whether anything changed.
    pub fn redo(&mut self) -> EditorResult<bool> {
        let had_pending_crop = self.machine.state() == SessionPhase::CropPending;
        self.machine.transition(SessionEvent::Redo)?;
        if had_pending_crop {
            self.discard_pending_crop();
        }

        let restored = self.history.redo().map(|snapshot| snapshot.image().clone());
        match restored {
            Some(image) => {
                self.restore_canvas(image);
                tracing::debug!(depth = self.history.len(), "redo applied");
                Ok(true)
            }
            None => {
                tracing::debug!("redo refused at the newest state");
                Ok(false)
            }
        }
    }

    /// Encodes the committed canvas with the session's configured format
    /// and quality. A staged crop does not affect the output.
    pub fn export(&self) -> EditorResult<EncodedImage> {
        let options = self.tools.options();
        self.export_as(options.export_format, options.jpeg_quality)
    }

    pub fn export_as(&self, format: ExportFormat, quality: u8) -> EditorResult<EncodedImage> {
        let encoded = codec::encode_image(self.canvas.image(), format, quality)?;
        tracing::info!(
            format = format.mime_type(),
            bytes = encoded.bytes.len(),
            "canvas exported"
        );
        Ok(encoded)
    }

    pub fn canvas(&self) -> &Surface {
        &self.canvas
    }

    pub fn overlay(&self) -> &Surface {
        &self.overlay
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    pub fn phase(&self) -> SessionPhase {
        self.machine.state()
    }

    pub fn active_tool(&self) -> ToolKind {
        self.tools.active_tool()
    }

    pub fn options(&self) -> &ToolOptions {
        self.tools.options()
    }

    pub fn options_mut(&mut self) -> &mut ToolOptions {
        self.tools.options_mut()
    }

    pub fn pending_crop(&self) -> Option<BoundingBox> {
        self.pending_crop
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Places the configured text with its first baseline at `point`.
    /// The font resolves before any phase change so a missing family leaves
    /// the session untouched.
    fn stamp_text(&mut self, point: Point) -> EditorResult<ActionOutcome> {
        let font = self.fonts.resolve(&self.tools.options().font_family)?;

        let had_pending_crop = self.machine.state() == SessionPhase::CropPending;
        self.machine.transition(SessionEvent::BeginAction)?;
        if had_pending_crop {
            self.discard_pending_crop();
        }

        let point = self.clamp_to_canvas(point);
        let options = self.tools.options();
        text::draw_text(
            &mut self.canvas,
            &font,
            &options.text,
            options.font_size as f32,
            options.text_align,
            point,
            options.stroke_color,
        );

        self.machine.transition(SessionEvent::FinishAction)?;
        self.commit_snapshot("text");
        Ok(ActionOutcome::Committed)
    }

    fn commit_snapshot(&mut self, operation: &str) {
        self.history.record(Snapshot::new(self.canvas.to_image()));
        tracing::debug!(
            operation,
            depth = self.history.len(),
            width = self.canvas.width(),
            height = self.canvas.height(),
            "canvas state committed"
        );
    }

    /// Swaps in new canvas content and resets the overlay to match its size.
    fn restore_canvas(&mut self, image: RgbaImage) {
        self.overlay = Surface::new(image.width(), image.height());
        self.canvas = Surface::from_image(image);
    }

    fn discard_pending_crop(&mut self) {
        self.pending_crop = None;
        self.overlay.clear();
    }

    fn clamp_to_canvas(&self, point: Point) -> Point {
        point.clamped_to(self.canvas.width(), self.canvas.height())
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("dimensions", &self.canvas.dimensions())
            .field("phase", &self.machine.state())
            .field("active_tool", &self.tools.active_tool())
            .field("history_depth", &self.history.len())
            .field("pending_crop", &self.pending_crop)
            .finish()
    }
}
