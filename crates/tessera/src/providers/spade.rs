//! Delaunay and Voronoi backend built on `spade`.
use std::collections::BTreeMap;

use glam::{DVec2, Vec2};
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::error::{Error, Result};
use crate::providers::{
    TriangulationProvider, VoronoiDiagram, VoronoiProvider, VoronoiRegion, VoronoiRidge,
};

/// Delaunay triangulation via `spade`; Voronoi as its dual.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpadeProvider;

impl TriangulationProvider for SpadeProvider {
    fn name(&self) -> &str {
        "spade"
    }

    fn triangulate(&self, points: &[Vec2]) -> Result<Vec<[usize; 3]>> {
        delaunay_faces(points)
    }
}

impl VoronoiProvider for SpadeProvider {
    fn name(&self) -> &str {
        "spade"
    }

    fn diagram(&self, points: &[Vec2]) -> Result<VoronoiDiagram> {
        let faces = delaunay_faces(points)?;
        Ok(dual_diagram(points, &faces))
    }
}

/// Inner faces of the Delaunay triangulation as index triples into `points`.
///
/// Duplicate points collapse onto the first occurrence.
fn delaunay_faces(points: &[Vec2]) -> Result<Vec<[usize; 3]>> {
    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    let mut handle_to_site: Vec<Option<usize>> = Vec::with_capacity(points.len());

    for (site, p) in points.iter().enumerate() {
        let handle = triangulation
            .insert(Point2::new(p.x as f64, p.y as f64))
            .map_err(|e| {
                Error::ProviderUnavailable(format!("spade rejected point {site}: {e:?}"))
            })?;
        let idx = handle.index();
        if idx >= handle_to_site.len() {
            handle_to_site.resize(idx + 1, None);
        }
        if handle_to_site[idx].is_none() {
            handle_to_site[idx] = Some(site);
        }
    }

    if triangulation.num_inner_faces() == 0 {
        return Err(Error::ProviderUnavailable(
            "fewer than three non-collinear points".into(),
        ));
    }

    let mut faces = Vec::with_capacity(triangulation.num_inner_faces());
    for face in triangulation.inner_faces() {
        let [a, b, c] = face
            .vertices()
            .map(|v| handle_to_site.get(v.fix().index()).copied().flatten());
        match (a, b, c) {
            (Some(a), Some(b), Some(c)) => faces.push([a, b, c]),
            _ => return Err(Error::Other("spade returned an unknown vertex".into())),
        }
    }
    Ok(faces)
}

/// Circumcentre of a triangle, or its vertex mean when the triangle is flat.
fn circumcenter(a: Vec2, b: Vec2, c: Vec2) -> Vec2 {
    let (a, b, c) = (a.as_dvec2(), b.as_dvec2(), c.as_dvec2());
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return ((a + b + c) / 3.0).as_vec2();
    }
    let (a2, b2, c2) = (a.length_squared(), b.length_squared(), c.length_squared());
    DVec2::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    )
    .as_vec2()
}

/// Voronoi diagram dual to a Delaunay face list.
///
/// One vertex per face (its circumcentre). A Delaunay edge shared by two faces
/// becomes a finite ridge; a hull edge becomes a ridge open on one side and
/// marks both of its sites as unbounded.
fn dual_diagram(points: &[Vec2], faces: &[[usize; 3]]) -> VoronoiDiagram {
    let vertices: Vec<Vec2> = faces
        .iter()
        .map(|&[a, b, c]| circumcenter(points[a], points[b], points[c]))
        .collect();

    let mut edge_faces: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
    for (k, &[a, b, c]) in faces.iter().enumerate() {
        for (i, j) in [(a, b), (b, c), (c, a)] {
            edge_faces.entry((i.min(j), i.max(j))).or_default().push(k);
        }
        for site in [a, b, c] {
            incident[site].push(k);
        }
    }

    let mut unbounded = vec![false; points.len()];
    let mut ridges = Vec::with_capacity(edge_faces.len());
    for ((a, b), adjacent) in edge_faces {
        let ridge_vertices = match adjacent.as_slice() {
            [f] => {
                unbounded[a] = true;
                unbounded[b] = true;
                [Some(*f), None]
            }
            [f, g, ..] => [Some(*f), Some(*g)],
            [] => continue,
        };
        ridges.push(VoronoiRidge {
            sites: [a, b],
            vertices: ridge_vertices,
        });
    }

    let regions = incident
        .into_iter()
        .enumerate()
        .map(|(site, mut ids)| {
            let origin = points[site];
            ids.sort_by(|&i, &j| {
                let (di, dj) = (vertices[i] - origin, vertices[j] - origin);
                let (ai, aj) = (di.y.atan2(di.x), dj.y.atan2(dj.x));
                ai.total_cmp(&aj).then(i.cmp(&j))
            });
            ids.dedup();
            VoronoiRegion {
                bounded: !unbounded[site] && ids.len() >= 3,
                vertices: ids,
            }
        })
        .collect();

    VoronoiDiagram {
        sites: points.to_vec(),
        vertices,
        ridges,
        regions,
    }
}
