//! The picking demo: a fixed scene and a click handler that marks the first
//! surface hit by the pick ray.

use glam::Vec3;
use raypick_camera::{screen_to_ray, OrbitCamera};
use raypick_geometry::{first_hit, Plane, Primitive, Ray};
use raypick_scene::{
    AppContext, Color3, GraphicsApp, Light, Material, Mesh, NodeId, PointerEvent, Scene,
    SceneError, Shape, Side,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{CameraConfig, PickingConfig};

/// Which scene object a pick landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickTarget {
    Sphere,
    Box,
    Ground,
}

/// Result of the most recent pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickOutcome {
    pub ray: Ray,
    pub hit: Option<(PickTarget, Vec3)>,
}

/// Handles of the meshes created by [`RaycastApp::build_scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNodes {
    pub ground: NodeId,
    pub sky: NodeId,
    pub cube: NodeId,
    pub sphere: NodeId,
    pub line: NodeId,
    pub marker: NodeId,
}

pub struct RaycastApp {
    camera_config: CameraConfig,
    picking: PickingConfig,
    nodes: Option<SceneNodes>,
    last_pick: Option<PickOutcome>,
}

impl RaycastApp {
    pub fn new(camera_config: CameraConfig, picking: PickingConfig) -> Self {
        Self {
            camera_config,
            picking,
            nodes: None,
            last_pick: None,
        }
    }

    /// Mesh handles, once the scene has been built.
    pub fn nodes(&self) -> Option<SceneNodes> {
        self.nodes
    }

    pub fn last_pick(&self) -> Option<&PickOutcome> {
        self.last_pick.as_ref()
    }

    /// Lay the line mesh along `ray`, starting one unit in front of the origin.
    fn show_ray(&self, scene: &mut Scene, nodes: SceneNodes, ray: &Ray) -> Result<(), SceneError> {
        let line = scene.get_mut(nodes.line)?;
        let depth = line.depth().unwrap_or(self.picking.line_length);

        line.visible = true;
        line.transform.position = ray.origin;
        line.transform.look_at(ray.origin + ray.direction);
        line.transform.translate_z(depth / -2.0 - 1.0);
        Ok(())
    }

    /// Test sphere, box and ground in that order; the first hit wins.
    fn intersect(
        &self,
        scene: &Scene,
        nodes: SceneNodes,
        ray: &Ray,
    ) -> Result<Option<(PickTarget, Vec3)>, SceneError> {
        let mut candidates = Vec::with_capacity(3);

        if let Some(sphere) = scene.get(nodes.sphere)?.bounding_sphere() {
            candidates.push((PickTarget::Sphere, Primitive::Sphere(sphere)));
        }

        // Bounds ignore rotation and scale; correct only while the cube keeps
        // a box-symmetric orientation and unit scale.
        if let Some(aabb) = scene.get(nodes.cube)?.unrotated_bounds() {
            candidates.push((PickTarget::Box, Primitive::Box(aabb)));
        }

        let ground = Plane::new(scene.get(nodes.ground)?.transform.position, Vec3::Y);
        candidates.push((PickTarget::Ground, Primitive::Plane(ground)));

        let primitives: Vec<Primitive> = candidates.iter().map(|(_, p)| *p).collect();
        Ok(first_hit(ray, &primitives).map(|(index, hit)| (candidates[index].0, hit.point)))
    }
}

impl GraphicsApp for RaycastApp {
    fn build_scene(&mut self, ctx: &mut AppContext<'_>) -> Result<(), SceneError> {
        let cam = &self.camera_config;
        let mut camera = OrbitCamera::new(
            cam.distance,
            cam.fov_degrees,
            ctx.viewport.aspect(),
            cam.near,
            cam.far,
        );
        camera.min_distance = cam.min_distance;
        camera.max_distance = cam.max_distance;
        *ctx.camera = camera;

        let scene = &mut *ctx.scene;

        scene.add_light(Light::Ambient {
            color: Color3::new(0.5, 0.5, 0.5),
        });
        scene.add_light(Light::Directional {
            color: Color3::new(0.6, 0.6, 0.6),
            position: Vec3::new(10.0, 0.0, 0.0),
        });

        let mut ground = Mesh::new(
            "ground",
            Shape::Plane {
                width: 1000.0,
                height: 1000.0,
            },
        )
        .with_material(Material::gouraud().with_ambient(Color3::new(0.425, 0.90, 0.555)));
        ground.transform.position = Vec3::new(0.0, -1.0, 0.0);
        ground
            .transform
            .set_euler_angles(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let ground = scene.add(ground);

        let sky = scene.add(
            Mesh::new("sky", Shape::Sphere { radius: 500.0 }).with_material(
                Material::unlit(Color3::new(0.529, 0.807, 0.921)).with_side(Side::Back),
            ),
        );

        let test_material = Material::gouraud()
            .with_ambient(Color3::new(0.0, 0.0, 1.0))
            .with_specular(Color3::WHITE);

        let mut cube = Mesh::new("box", Shape::unit_box()).with_material(test_material);
        cube.transform.translate_x(-2.0);
        cube.transform
            .set_euler_angles(std::f32::consts::PI, 0.0, 0.0);
        let cube = scene.add(cube);

        let mut sphere =
            Mesh::new("sphere", Shape::Sphere { radius: 0.5 }).with_material(test_material);
        sphere.transform.translate_x(2.0);
        let sphere = scene.add(sphere);

        let thickness = self.picking.line_thickness;
        let mut line = Mesh::new(
            "ray line",
            Shape::Box {
                width: thickness,
                height: thickness,
                depth: self.picking.line_length,
            },
        )
        .with_material(Material::unlit(self.picking.line_color));
        line.visible = false;
        let line = scene.add(line);

        let mut marker = Mesh::new(
            "marker",
            Shape::Sphere {
                radius: self.picking.marker_radius,
            },
        )
        .with_material(
            Material::gouraud()
                .with_ambient(self.picking.marker_color)
                .with_diffuse(self.picking.marker_color),
        );
        marker.visible = false;
        let marker = scene.add(marker);

        self.nodes = Some(SceneNodes {
            ground,
            sky,
            cube,
            sphere,
            line,
            marker,
        });

        info!(meshes = scene.len(), "scene built");
        Ok(())
    }

    fn on_frame(&mut self, _ctx: &mut AppContext<'_>, _dt: f32) -> Result<(), SceneError> {
        Ok(())
    }

    fn on_pointer_down(
        &mut self,
        ctx: &mut AppContext<'_>,
        event: PointerEvent,
    ) -> Result<(), SceneError> {
        let Some(nodes) = self.nodes else {
            warn!("pointer down before the scene was built");
            return Ok(());
        };

        let ray = screen_to_ray(event.position, ctx.viewport, ctx.camera);
        self.show_ray(ctx.scene, nodes, &ray)?;
        ctx.scene.get_mut(nodes.marker)?.visible = false;

        let hit = self.intersect(ctx.scene, nodes, &ray)?;
        match hit {
            Some((target, point)) => {
                let marker = ctx.scene.get_mut(nodes.marker)?;
                marker.transform.position = point;
                marker.visible = true;
                debug!(
                    button = ?event.button,
                    ?target,
                    x = point.x,
                    y = point.y,
                    z = point.z,
                    "pick hit"
                );
            }
            None => debug!(button = ?event.button, pixel = ?event.position, "pick missed"),
        }

        self.last_pick = Some(PickOutcome { ray, hit });
        Ok(())
    }
}
