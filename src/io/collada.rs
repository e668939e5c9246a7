// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::error::SceneLoadError;
use crate::core::material::Material;
use crate::core::scene::SceneObject;
use crate::materials::emissive::Emissive;
use crate::materials::lambertian_diffuse::LambertianDiffuse;
use crate::math::constants::{Float, Matrix4f, Vector3f};
use crate::math::energy::Energy;
use crate::shapes::triangle::Triangle;

const DEFAULT_ALBEDO: Float = 0.8;

#[derive(Default)]
struct EffectDesc {
    diffuse: Option<Energy>,
    emission: Option<Energy>,
}

struct InputDesc {
    semantic: String,
    source: String,
    offset: usize,
}

#[derive(Default)]
struct TrianglesDesc {
    material: Option<String>,
    count: Option<usize>,
    inputs: Vec<InputDesc>,
    indices: Vec<usize>,
}

#[derive(Default)]
struct GeometryDesc {
    sources: HashMap<String, Vec<Float>>,
    // <vertices id> -> position source id
    vertices: HashMap<String, String>,
    triangles: Vec<TrianglesDesc>,
}

struct InstanceDesc {
    geometry: String,
    bindings: HashMap<String, String>,
    to_world: Matrix4f,
}

#[derive(Default)]
struct ColladaDoc {
    effects: HashMap<String, EffectDesc>,
    // material id -> effect id
    materials: HashMap<String, String>,
    geometries: HashMap<String, GeometryDesc>,
    geometry_order: Vec<String>,
    instances: Vec<InstanceDesc>,
}

/// Triangles of a Collada file as scene objects, one per triangle, in
/// world space.
pub fn load_collada<P: AsRef<Path>>(path: P) -> Result<Vec<SceneObject>, SceneLoadError> {
    let xml = fs::read_to_string(path.as_ref())?;
    let objects = parse_collada(&xml)?;
    log::info!("Loaded {} triangles from {}.", objects.len(), path.as_ref().display());
    Ok(objects)
}

pub fn parse_collada(xml: &str) -> Result<Vec<SceneObject>, SceneLoadError> {
    let doc = read_document(xml)?;
    build_objects(&doc)
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| attr.unescape_value().unwrap_or_default().to_string())
}

fn strip_hash(url: &str) -> String {
    url.strip_prefix('#').unwrap_or(url).to_string()
}

fn parse_floats(text: &str) -> Result<Vec<Float>, SceneLoadError> {
    text.split_whitespace()
        .map(|v| v.parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", v))))
        .collect()
}

fn parse_indices(text: &str) -> Result<Vec<usize>, SceneLoadError> {
    text.split_whitespace()
        .map(|v| v.parse::<usize>().map_err(|_| SceneLoadError::Parse(format!("invalid index: {}", v))))
        .collect()
}

fn parse_color(text: &str) -> Result<Energy, SceneLoadError> {
    let values = parse_floats(text)?;
    if values.len() < 3 {
        return Err(SceneLoadError::Parse(format!("color needs at least 3 components: {}", text)));
    }
    Ok(Energy::new(values[0], values[1], values[2]))
}

fn read_document(xml: &str) -> Result<ColladaDoc, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut doc = ColladaDoc::default();
    let mut stack: Vec<Vec<u8>> = Vec::new();

    let mut current_effect: Option<String> = None;
    let mut current_material: Option<String> = None;
    let mut current_geometry: Option<String> = None;
    let mut current_source: Option<String> = None;
    let mut current_vertices: Option<String> = None;
    let mut current_triangles: Option<TrianglesDesc> = None;
    let mut current_instance: Option<InstanceDesc> = None;
    let mut node_matrices: Vec<Matrix4f> = Vec::new();

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => break,
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                match e.name().as_ref() {
                    b"effect" => {
                        let id = attr_value(e, b"id").ok_or(SceneLoadError::MissingField("effect.id"))?;
                        doc.effects.entry(id.clone()).or_default();
                        current_effect = Some(id);
                    }
                    b"material" if stack.iter().any(|s| s.as_slice() == b"library_materials") => {
                        current_material = attr_value(e, b"id");
                    }
                    b"instance_effect" => {
                        if let (Some(material), Some(url)) = (current_material.as_ref(), attr_value(e, b"url")) {
                            doc.materials.insert(material.clone(), strip_hash(&url));
                        }
                    }
                    b"geometry" => {
                        let id = attr_value(e, b"id").ok_or(SceneLoadError::MissingField("geometry.id"))?;
                        doc.geometries.entry(id.clone()).or_default();
                        doc.geometry_order.push(id.clone());
                        current_geometry = Some(id);
                    }
                    b"source" if current_geometry.is_some() => {
                        current_source = attr_value(e, b"id");
                    }
                    b"vertices" => {
                        current_vertices = attr_value(e, b"id");
                    }
                    b"triangles" => {
                        current_triangles = Some(TrianglesDesc {
                            material: attr_value(e, b"material"),
                            count: attr_value(e, b"count").and_then(|c| c.parse().ok()),
                            ..TrianglesDesc::default()
                        });
                    }
                    b"polylist" | b"polygons" | b"lines" | b"linestrips" | b"trifans" | b"tristrips" => {
                        log::warn!("Skipping unsupported Collada primitive <{}>.",
                                   String::from_utf8_lossy(e.name().as_ref()));
                    }
                    b"input" => {
                        let semantic = attr_value(e, b"semantic").unwrap_or_default();
                        let source = strip_hash(&attr_value(e, b"source").unwrap_or_default());
                        if let Some(triangles) = current_triangles.as_mut() {
                            let offset = match attr_value(e, b"offset") {
                                Some(o) => o.parse::<usize>()
                                    .map_err(|_| SceneLoadError::Parse(format!("invalid input offset: {}", o)))?,
                                None => 0,
                            };
                            triangles.inputs.push(InputDesc { semantic, source, offset });
                        } else if let (Some(vertices), Some(geometry)) = (current_vertices.as_ref(), current_geometry.as_ref()) {
                            if semantic == "POSITION" {
                                if let Some(g) = doc.geometries.get_mut(geometry) {
                                    g.vertices.insert(vertices.clone(), source);
                                }
                            }
                        }
                    }
                    b"node" => {
                        if is_start {
                            let parent = node_matrices.last().copied().unwrap_or_else(Matrix4f::identity);
                            node_matrices.push(parent);
                        }
                    }
                    b"instance_geometry" => {
                        let url = attr_value(e, b"url").ok_or(SceneLoadError::MissingField("instance_geometry.url"))?;
                        let instance = InstanceDesc {
                            geometry: strip_hash(&url),
                            bindings: HashMap::new(),
                            to_world: node_matrices.last().copied().unwrap_or_else(Matrix4f::identity),
                        };
                        if is_start {
                            current_instance = Some(instance);
                        } else {
                            doc.instances.push(instance);
                        }
                    }
                    b"instance_material" => {
                        if let Some(instance) = current_instance.as_mut() {
                            if let (Some(symbol), Some(target)) = (attr_value(e, b"symbol"), attr_value(e, b"target")) {
                                instance.bindings.insert(symbol, strip_hash(&target));
                            }
                        }
                    }
                    _ => {}
                }
                if is_start {
                    stack.push(e.name().as_ref().to_vec());
                }
            }
            Event::Text(ref t) => {
                let text = t.unescape()?;
                let top = stack.last().map(|s| s.as_slice());
                let parent = if stack.len() >= 2 { Some(stack[stack.len() - 2].as_slice()) } else { None };
                match top {
                    Some(b"float_array") => {
                        if let (Some(geometry), Some(source)) = (current_geometry.as_ref(), current_source.as_ref()) {
                            if let Some(g) = doc.geometries.get_mut(geometry) {
                                g.sources.insert(source.clone(), parse_floats(&text)?);
                            }
                        }
                    }
                    Some(b"p") => {
                        if let Some(triangles) = current_triangles.as_mut() {
                            triangles.indices.extend(parse_indices(&text)?);
                        }
                    }
                    Some(b"color") => {
                        if let Some(effect) = current_effect.as_ref().and_then(|id| doc.effects.get_mut(id)) {
                            match parent {
                                Some(b"diffuse") => effect.diffuse = Some(parse_color(&text)?),
                                Some(b"emission") => effect.emission = Some(parse_color(&text)?),
                                _ => {}
                            }
                        }
                    }
                    Some(b"matrix") if parent == Some(b"node".as_slice()) => {
                        let values = parse_floats(&text)?;
                        if values.len() != 16 {
                            return Err(SceneLoadError::Parse(format!("node matrix needs 16 values, got {}", values.len())));
                        }
                        let local = Matrix4f::from_row_slice(&values);
                        if let Some(current) = node_matrices.last_mut() {
                            *current *= local;
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                match e.name().as_ref() {
                    b"effect" => current_effect = None,
                    b"material" => current_material = None,
                    b"geometry" => current_geometry = None,
                    b"source" => current_source = None,
                    b"vertices" => current_vertices = None,
                    b"triangles" => {
                        if let (Some(triangles), Some(geometry)) = (current_triangles.take(), current_geometry.as_ref()) {
                            if let Some(g) = doc.geometries.get_mut(geometry) {
                                g.triangles.push(triangles);
                            }
                        }
                    }
                    b"instance_geometry" => {
                        if let Some(instance) = current_instance.take() {
                            doc.instances.push(instance);
                        }
                    }
                    b"node" => {
                        node_matrices.pop();
                    }
                    _ => {}
                }
                stack.pop();
            }
            _ => {}
        }
    }

    Ok(doc)
}

fn material_for(doc: &ColladaDoc,
                cache: &mut HashMap<String, Arc<dyn Material>>,
                material_id: Option<&str>) -> Arc<dyn Material> {
    let key = material_id.unwrap_or("").to_string();
    if let Some(material) = cache.get(&key) {
        return material.clone();
    }

    let effect = material_id
        .and_then(|id| doc.materials.get(id))
        .and_then(|effect_id| doc.effects.get(effect_id));
    if effect.is_none() {
        log::warn!("Material {:?} has no usable effect; using a grey diffuse.", material_id);
    }

    let emission = effect.and_then(|e| e.emission).filter(|e| !e.is_zero());
    let material: Arc<dyn Material> = match emission {
        Some(radiance) => Arc::new(Emissive::new(radiance)),
        None => {
            let diffuse = effect.and_then(|e| e.diffuse).unwrap_or_else(|| Energy::splat(DEFAULT_ALBEDO));
            Arc::new(LambertianDiffuse::new(diffuse))
        }
    };
    cache.insert(key, material.clone());
    material
}

fn transform_point(m: &Matrix4f, p: &Vector3f) -> Vector3f {
    let h = m * p.push(1.0);
    if h.w != 0.0 && h.w != 1.0 {
        Vector3f::new(h.x / h.w, h.y / h.w, h.z / h.w)
    } else {
        h.xyz()
    }
}

fn build_objects(doc: &ColladaDoc) -> Result<Vec<SceneObject>, SceneLoadError> {
    // Without a visual scene every geometry is placed once, untransformed.
    let fallback: Vec<InstanceDesc>;
    let instances = if doc.instances.is_empty() {
        fallback = doc.geometry_order.iter().map(|id| InstanceDesc {
            geometry: id.clone(),
            bindings: HashMap::new(),
            to_world: Matrix4f::identity(),
        }).collect();
        &fallback
    } else {
        &doc.instances
    };

    let mut cache: HashMap<String, Arc<dyn Material>> = HashMap::new();
    let mut objects = Vec::new();
    let mut degenerate = 0usize;

    for instance in instances {
        let geometry = doc.geometries.get(&instance.geometry)
            .ok_or_else(|| SceneLoadError::Parse(format!("unknown geometry: {}", instance.geometry)))?;

        for triangles in &geometry.triangles {
            let vertex_input = triangles.inputs.iter()
                .find(|input| input.semantic == "VERTEX")
                .ok_or(SceneLoadError::MissingField("triangles.input[VERTEX]"))?;
            let position_source = geometry.vertices.get(&vertex_input.source)
                .unwrap_or(&vertex_input.source);
            let positions = geometry.sources.get(position_source)
                .ok_or(SceneLoadError::MissingField("source.float_array"))?;

            let stride = triangles.inputs.iter().map(|i| i.offset).max().unwrap_or(0) + 1;
            let available = triangles.indices.len() / (3 * stride);
            let count = triangles.count.map_or(available, |c| c.min(available));

            let material_id = triangles.material.as_ref()
                .map(|symbol| instance.bindings.get(symbol).unwrap_or(symbol).as_str());
            let material = material_for(doc, &mut cache, material_id);

            for t in 0..count {
                let mut corners = [Vector3f::zeros(); 3];
                for (c, corner) in corners.iter_mut().enumerate() {
                    let index = triangles.indices[(3 * t + c) * stride + vertex_input.offset];
                    let p = index.checked_mul(3)
                        .and_then(|start| positions.get(start..start + 3))
                        .ok_or_else(|| SceneLoadError::Parse(format!("vertex index {} out of range", index)))?;
                    *corner = transform_point(&instance.to_world, &Vector3f::new(p[0], p[1], p[2]));
                }

                let triangle = Triangle::new(corners[0], corners[1], corners[2]);
                if triangle.is_degenerate() {
                    degenerate += 1;
                    continue;
                }
                objects.push(SceneObject::new(Arc::new(triangle), material.clone())
                    .with_name(instance.geometry.clone()));
            }
        }
    }

    if degenerate > 0 {
        log::warn!("Dropped {} degenerate triangles.", degenerate);
    }
    Ok(objects)
}
