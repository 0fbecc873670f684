//! Stick-figure preview renderer
//!
//! Draws the creature's skeleton so a pose can be checked without game
//! sprites: every joint becomes a line whose angle follows its tilt, the
//! figure is mirrored for the facing direction, and the head shows the eyes
//! and mood.

use image::{Pixel, Rgba, RgbaImage};

use crate::breed::{BreedKey, Genus};
use crate::pose::{Joint, Mood, Pose, PoseFacing, Tilt};
use crate::render::{PoseRenderer, RenderError};
use crate::request::{RenderRequest, MAX_AGE};

const CANVAS_WIDTH: u32 = 48;
const CANVAS_HEIGHT: u32 = 64;
/// Hip position on the canvas
const HIP: (f32, f32) = (24.0, 36.0);

const EYE: Rgba<u8> = Rgba([24, 24, 32, 255]);
const SHADE: f32 = 0.75;

/// Draws poses as stick figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkeletonRenderer;

/// Degrees a tilt lifts a limb away from its rest angle.
fn lift(tilt: Tilt) -> f32 {
    match tilt {
        Tilt::Down => -30.0,
        Tilt::Straight => 0.0,
        Tilt::Up => 30.0,
        Tilt::FarUp => 60.0,
    }
}

/// Angle of a hanging limb raised toward `side` (+1 right, -1 left).
fn hanging(side: f32, tilt: Tilt) -> f32 {
    90.0 - side * lift(tilt)
}

/// Angle of a horizontal limb pointing toward `side`; straight down when `side` is 0.
fn horizontal(side: f32, tilt: Tilt) -> f32 {
    if side > 0.0 {
        -lift(tilt)
    } else if side < 0.0 {
        180.0 + lift(tilt)
    } else {
        90.0
    }
}

fn step(from: (f32, f32), degrees: f32, length: f32) -> (f32, f32) {
    let radians = degrees.to_radians();
    (from.0 + radians.cos() * length, from.1 + radians.sin() * length)
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Line { from: (f32, f32), to: (f32, f32), width: i32 },
    Head { center: (f32, f32), radius: f32 },
}

#[derive(Debug, Clone, Copy)]
struct Stroke {
    joint: Joint,
    shape: Shape,
    shaded: bool,
}

/// Base color for a genus, before the color transform.
fn genus_color(key: Option<BreedKey>) -> Rgba<u8> {
    match key.and_then(|k| k.genus) {
        Some(Genus::Norn) => Rgba([222, 184, 135, 255]),
        Some(Genus::Grendel) => Rgba([96, 160, 80, 255]),
        Some(Genus::Ettin) => Rgba([150, 150, 164, 255]),
        Some(Genus::Shee) => Rgba([190, 170, 220, 255]),
        None => Rgba([200, 200, 200, 255]),
    }
}

fn part_key(request: &RenderRequest, joint: Joint) -> Option<BreedKey> {
    let breeds = &request.breeds;
    match joint {
        Joint::Head => breeds.head,
        Joint::Body => breeds.body,
        Joint::LeftThigh
        | Joint::LeftShin
        | Joint::LeftFoot
        | Joint::RightThigh
        | Joint::RightShin
        | Joint::RightFoot => breeds.legs,
        Joint::LeftUpperArm | Joint::LeftForearm | Joint::RightUpperArm | Joint::RightForearm => {
            breeds.arms
        }
        Joint::TailBase | Joint::TailTip => breeds.tail,
    }
}

fn shade(color: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = color.0;
    let dim = |c: u8| (f32::from(c) * SHADE).round() as u8;
    Rgba([dim(r), dim(g), dim(b), a])
}

struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    fn plot(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.image.width() as i32 || y >= self.image.height() as i32 {
            return;
        }
        self.image.get_pixel_mut(x as u32, y as u32).blend(&color);
    }

    fn brush(&mut self, x: i32, y: i32, width: i32, color: Rgba<u8>) {
        let low = -(width - 1) / 2;
        for dy in low..low + width {
            for dx in low..low + width {
                self.plot(x + dx, y + dy, color);
            }
        }
    }

    /// Bresenham line drawn with a square brush.
    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: i32, color: Rgba<u8>) {
        let (mut x0, mut y0) = (from.0.round() as i32, from.1.round() as i32);
        let (x1, y1) = (to.0.round() as i32, to.1.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.brush(x0, y0, width, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn disc(&mut self, center: (f32, f32), radius: f32, color: Rgba<u8>) {
        let r = radius.ceil() as i32;
        let (cx, cy) = (center.0.round() as i32, center.1.round() as i32);
        for y in -r..=r {
            for x in -r..=r {
                if ((x * x + y * y) as f32) <= radius * radius {
                    self.plot(cx + x, cy + y, color);
                }
            }
        }
    }
}

/// Lay out every body part for `pose`, in back-to-front order.
fn skeleton(pose: &Pose, size: f32) -> Vec<Stroke> {
    let facing: f32 = match pose.body_facing {
        PoseFacing::ViewerRight => 1.0,
        PoseFacing::ViewerLeft => -1.0,
        PoseFacing::Front | PoseFacing::Back => 0.0,
    };
    // Horizontal direction of each side's limbs, and whether that side is
    // turned away from the viewer
    let (left_side, right_side, left_far, right_far): (f32, f32, bool, bool) = match pose.body_facing {
        PoseFacing::ViewerRight => (1.0, 1.0, false, true),
        PoseFacing::ViewerLeft => (-1.0, -1.0, true, false),
        PoseFacing::Front => (1.0, -1.0, false, false),
        PoseFacing::Back => (-1.0, 1.0, false, false),
    };
    let spread = if facing == 0.0 { 3.0 * size } else { 0.0 };
    let hip = HIP;

    let torso_angle = -90.0 + facing * lift(pose.body) * 0.5;
    let neck = step(hip, torso_angle, 14.0 * size);
    let head_radius = 5.0 * size;
    let head = step(neck, torso_angle + facing * lift(pose.head) * 0.3, head_radius);
    let shoulder = step(hip, torso_angle, 11.0 * size);

    let mut strokes = Vec::new();
    let line = |joint: Joint, from, to, width, shaded| Stroke {
        joint,
        shape: Shape::Line { from, to, width },
        shaded,
    };

    let tail_side = -facing;
    let tail_mid = step(hip, horizontal(tail_side, pose.tail_base), 7.0 * size);
    let tail_end = step(tail_mid, horizontal(tail_side, pose.tail_tip), 6.0 * size);
    strokes.push(line(Joint::TailBase, hip, tail_mid, 2, facing != 0.0));
    strokes.push(line(Joint::TailTip, tail_mid, tail_end, 1, facing != 0.0));

    let limbs = |[thigh, shin, foot, upper, fore]: [Joint; 5], side: f32, far: bool| {
        let offset = spread * side;
        let hip_at = (hip.0 + offset, hip.1);
        let knee = step(hip_at, hanging(side, pose.tilt(thigh)), 9.0 * size);
        let ankle = step(knee, hanging(side, pose.tilt(shin)), 8.0 * size);
        let toe = step(ankle, horizontal(side * facing.abs(), pose.tilt(foot)), 4.0 * size);
        let shoulder_at = (shoulder.0 + offset, shoulder.1);
        let elbow = step(shoulder_at, 90.0 - side * lift(pose.tilt(upper)) * 1.5, 8.0 * size);
        let hand = step(elbow, 90.0 - side * lift(pose.tilt(fore)) * 1.5, 7.0 * size);
        vec![
            line(thigh, hip_at, knee, 2, far),
            line(shin, knee, ankle, 2, far),
            line(foot, ankle, toe, 2, far),
            line(upper, shoulder_at, elbow, 2, far),
            line(fore, elbow, hand, 2, far),
        ]
    };
    let left = limbs(
        [Joint::LeftThigh, Joint::LeftShin, Joint::LeftFoot, Joint::LeftUpperArm, Joint::LeftForearm],
        left_side,
        left_far,
    );
    let right = limbs(
        [
            Joint::RightThigh,
            Joint::RightShin,
            Joint::RightFoot,
            Joint::RightUpperArm,
            Joint::RightForearm,
        ],
        right_side,
        right_far,
    );
    let (far, near) = if left_far { (left, right) } else { (right, left) };

    strokes.extend(far);
    strokes.push(line(Joint::Body, hip, neck, 4, false));
    strokes.extend(near);
    strokes.push(Stroke {
        joint: Joint::Head,
        shape: Shape::Head { center: head, radius: head_radius },
        shaded: false,
    });
    strokes
}

/// Eyes and mouth for a head drawn at `center`.
fn face(canvas: &mut Canvas, pose: &Pose, center: (f32, f32), radius: f32, alpha: u8) {
    let eye = Rgba([EYE[0], EYE[1], EYE[2], alpha]);
    let (cx, cy) = (center.0.round() as i32, center.1.round() as i32);
    let spacing = (radius * 0.45).round().max(1.0) as i32;
    let eye_y = cy - (lift(pose.head) / 30.0).round() as i32;
    let eyes: Vec<i32> = match pose.head_facing {
        PoseFacing::Front => vec![cx - spacing, cx + spacing],
        PoseFacing::ViewerRight => vec![cx + spacing],
        PoseFacing::ViewerLeft => vec![cx - spacing],
        PoseFacing::Back => Vec::new(),
    };
    for x in &eyes {
        if pose.eyes_closed || pose.mood == Mood::Sleepy {
            canvas.plot(x - 1, eye_y, eye);
            canvas.plot(*x, eye_y, eye);
        } else {
            canvas.plot(*x, eye_y - 1, eye);
            canvas.plot(*x, eye_y, eye);
        }
    }

    if pose.head_facing != PoseFacing::Front {
        return;
    }
    let mouth_y = eye_y + spacing + 1;
    let corners = match pose.mood {
        Mood::Happy => -1,
        Mood::Sad | Mood::Angry => 1,
        Mood::Normal | Mood::Scared | Mood::Sleepy => 0,
    };
    for x in cx - spacing + 1..cx + spacing {
        canvas.plot(x, mouth_y, eye);
    }
    canvas.plot(cx - spacing, mouth_y + corners, eye);
    canvas.plot(cx + spacing, mouth_y + corners, eye);
    if pose.mood == Mood::Scared {
        canvas.plot(cx, mouth_y + 1, eye);
    }
}

impl PoseRenderer for SkeletonRenderer {
    fn render(&self, request: &RenderRequest, pose: &Pose) -> Result<RgbaImage, RenderError> {
        if pose.variant != request.variant {
            return Err(RenderError::Failed {
                pose: pose.to_pose_string(),
                message: format!("pose is for {} but the request is for {}", pose.variant, request.variant),
            });
        }

        let age = request.age.unwrap_or(MAX_AGE);
        let size = 0.55 + 0.075 * f32::from(age);
        let ghost_alpha = (request.ghost_alpha.clamp(0.0, 1.0) * 255.0).round() as u8;

        let mut strokes: Vec<Stroke> =
            skeleton(pose, size).into_iter().filter(|s| !request.hidden.contains(&s.joint.part())).collect();
        if request.ghost_parts_below {
            strokes.sort_by_key(|s| !request.ghost.contains(&s.joint.part()));
        }

        let mut canvas = Canvas { image: RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT) };
        for stroke in strokes {
            let base = genus_color(part_key(request, stroke.joint));
            let mut color = request.colors.apply(if stroke.shaded { shade(base) } else { base });
            let alpha = if request.ghost.contains(&stroke.joint.part()) { ghost_alpha } else { 255 };
            color[3] = alpha;

            match stroke.shape {
                Shape::Line { from, to, width } => canvas.line(from, to, width, color),
                Shape::Head { center, radius } => {
                    canvas.disc(center, radius, color);
                    face(&mut canvas, pose, center, radius, alpha);
                }
            }
        }
        Ok(canvas.image)
    }
}
