//! Frame annotation: skeleton, measured angles, lifter box, bar path and counters.

use crate::{
    config::DisplayConfig,
    joints::{BoundingBox, FrameJointMap, Point},
    landmarks::{AngleTriple, LandmarkSet},
    session::FrameReport,
    tracker::PathCheck,
    Result,
};
use opencv::{
    core::{self, Mat, Rect, Scalar},
    imgproc::{self, FILLED, FONT_HERSHEY_PLAIN, LINE_8},
};

fn green() -> Scalar {
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

fn blue() -> Scalar {
    Scalar::new(255.0, 0.0, 0.0, 0.0)
}

fn red() -> Scalar {
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

fn white() -> Scalar {
    Scalar::new(255.0, 255.0, 255.0, 0.0)
}

fn cv_point(p: Point) -> core::Point {
    core::Point::new(p.x, p.y)
}

/// Draws a [`FrameReport`] onto its frame
pub struct Overlay {
    display: DisplayConfig,
}

impl Overlay {
    #[must_use]
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    /// Annotate `frame` in place
    ///
    /// # Errors
    ///
    /// Returns an error if any drawing call fails
    pub fn draw(&self, frame: &mut Mat, report: &FrameReport, set: &LandmarkSet, fps: f64) -> Result<()> {
        if self.display.draw_box {
            if let Some(bbox) = &report.bounding_box {
                draw_bounding_box(frame, bbox)?;
            }
        }
        if self.display.draw_landmarks {
            draw_landmarks(frame, &report.joints, set)?;
        }
        if report.angles.hip.is_some() {
            draw_angle(frame, &report.joints, set.hip_angle, report.angles.hip)?;
        }
        if report.angles.knee.is_some() {
            draw_angle(frame, &report.joints, set.knee_angle, report.angles.knee)?;
        }
        if self.display.draw_path {
            draw_path(frame, &report.path)?;
        }
        if let Some(plate) = report.plate {
            imgproc::circle(frame, cv_point(plate.center()), plate.radius, red(), 2, LINE_8, 0)?;
        }
        draw_status(frame, fps, report.frame_index, report.rep_count)
    }
}

/// Green rectangle around the lifter
///
/// # Errors
///
/// Returns an error if `OpenCV` drawing fails
pub fn draw_bounding_box(frame: &mut Mat, bbox: &BoundingBox) -> Result<()> {
    let rect = Rect::new(bbox.min.x, bbox.min.y, bbox.width(), bbox.height());
    imgproc::rectangle(frame, rect, green(), 2, LINE_8, 0)?;
    Ok(())
}

/// Landmark dots and skeleton lines of the active set
///
/// # Errors
///
/// Returns an error if `OpenCV` drawing fails
pub fn draw_landmarks(frame: &mut Mat, joints: &FrameJointMap, set: &LandmarkSet) -> Result<()> {
    for &(a, b) in set.connections() {
        if let (Some(pa), Some(pb)) = (joints.get(a), joints.get(b)) {
            imgproc::line(frame, cv_point(pa), cv_point(pb), white(), 2, LINE_8, 0)?;
        }
    }
    for (_, point) in joints.iter() {
        imgproc::circle(frame, cv_point(point), 5, blue(), FILLED, LINE_8, 0)?;
    }
    Ok(())
}

/// Both rays of an angle, its three joints and the value beside the vertex
///
/// # Errors
///
/// Returns an error if `OpenCV` drawing fails
pub fn draw_angle(frame: &mut Mat, joints: &FrameJointMap, triple: AngleTriple, angle: Option<f64>) -> Result<()> {
    let [a, vertex, b] = triple;
    let (Some(pa), Some(pv), Some(pb)) = (joints.get(a), joints.get(vertex), joints.get(b)) else {
        return Ok(());
    };

    imgproc::line(frame, cv_point(pa), cv_point(pv), white(), 3, LINE_8, 0)?;
    imgproc::line(frame, cv_point(pb), cv_point(pv), white(), 3, LINE_8, 0)?;
    for p in [pa, pv, pb] {
        imgproc::circle(frame, cv_point(p), 10, green(), FILLED, LINE_8, 0)?;
        imgproc::circle(frame, cv_point(p), 15, green(), 2, LINE_8, 0)?;
    }

    if let Some(angle) = angle {
        imgproc::put_text(
            frame,
            &format!("{angle:.0}"),
            core::Point::new(pv.x.saturating_sub(50), pv.y.saturating_add(50)),
            FONT_HERSHEY_PLAIN,
            2.0,
            blue(),
            2,
            LINE_8,
            false,
        )?;
    }
    Ok(())
}

/// Bar path, thick near the newest point
///
/// # Errors
///
/// Returns an error if `OpenCV` drawing fails
pub fn draw_path(frame: &mut Mat, path: &PathCheck) -> Result<()> {
    for segment in &path.segments {
        imgproc::line(
            frame,
            cv_point(segment.from),
            cv_point(segment.to),
            red(),
            segment.thickness,
            LINE_8,
            0,
        )?;
    }
    Ok(())
}

/// Frame number, frame rate and rep count in the top-left corner
///
/// # Errors
///
/// Returns an error if `OpenCV` drawing fails
pub fn draw_status(frame: &mut Mat, fps: f64, frame_index: u64, reps: f64) -> Result<()> {
    let lines = [
        (format!("Num: {frame_index}"), core::Point::new(10, 20)),
        (format!("fps: {fps:.0}"), core::Point::new(145, 20)),
        (format!("Reps: {reps:.1}"), core::Point::new(10, 45)),
    ];
    for (text, origin) in &lines {
        imgproc::put_text(frame, text, *origin, FONT_HERSHEY_PLAIN, 1.5, blue(), 1, LINE_8, false)?;
    }
    Ok(())
}
