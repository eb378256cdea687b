use glam::{Mat4, Vec3};

/// Camera sits ten units back on -Z looking at the origin.
const EYE: Vec3 = Vec3::new(0.0, 0.0, -10.0);
/// Up is -Y: the quad's UVs are laid out for a flipped view.
const UP: Vec3 = Vec3::new(0.0, -1.0, 0.0);
const FOV_Y: f32 = std::f32::consts::PI / 7.0;
const Z_NEAR: f32 = 1.0;
const Z_FAR: f32 = 100.0;

/// Translate the sprite quad along world X.
pub fn world(offset_x: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(offset_x, 0.0, 0.0))
}

pub fn view() -> Mat4 {
    Mat4::look_at_lh(EYE, Vec3::ZERO, UP)
}

/// Left-handed perspective with a [0, 1] depth range.
pub fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_lh(FOV_Y, aspect.max(f32::EPSILON), Z_NEAR, Z_FAR)
}

/// Combined clip-from-object matrix for a surface of `width` x `height`.
pub fn model_view_projection(offset_x: f32, width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    projection(aspect) * view() * world(offset_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_centre() {
        let p = model_view_projection(0.0, 800, 800).project_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn positive_offset_moves_left_on_screen() {
        let p = model_view_projection(0.5, 800, 800).project_point3(Vec3::ZERO);
        assert!(p.x < 0.0);
        let q = model_view_projection(-0.5, 800, 800).project_point3(Vec3::ZERO);
        assert!(q.x > 0.0);
    }

    #[test]
    fn quad_fits_on_screen() {
        let mvp = model_view_projection(0.0, 800, 800);
        for corner in [
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ] {
            let p = mvp.project_point3(corner);
            assert!(p.x.abs() < 1.0 && p.y.abs() < 1.0, "{corner:?} -> {p:?}");
        }
    }

    #[test]
    fn zero_sized_surface_does_not_produce_nan() {
        let mvp = model_view_projection(0.0, 0, 0);
        assert!(mvp.is_finite());
    }
}
