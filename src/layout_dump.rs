use crate::layout::WedgeLayout;
use crate::session::{Caption, ChartSession};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub depth: u32,
    pub wrapper_width: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub center: [f32; 2],
    pub container_height: f32,
    pub caption: Caption,
    pub wedges: Vec<WedgeDump>,
}

#[derive(Debug, Serialize)]
pub struct WedgeDump {
    pub anum: u64,
    pub id: String,
    pub name: String,
    pub quality: i64,
    pub collapse: bool,
    pub depth: u32,
    pub parent: Option<u64>,
    pub start_angle: f32,
    pub end_angle: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub visible: bool,
    pub opacity: f32,
}

impl LayoutDump {
    pub fn from_session(session: &ChartSession) -> Self {
        let layout = session.layout();
        let highlight = session.highlight();
        let parent_num = |wedge: &WedgeLayout| wedge.parent.map(|idx| layout.wedges[idx].anum);
        let wedges = layout
            .wedges
            .iter()
            .map(|wedge| WedgeDump {
                anum: wedge.anum,
                id: wedge.id.clone(),
                name: wedge.name.clone(),
                quality: wedge.quality.code(),
                collapse: wedge.collapse,
                depth: wedge.depth,
                parent: parent_num(wedge),
                start_angle: wedge.start_angle,
                end_angle: wedge.end_angle,
                inner_radius: wedge.inner_radius,
                outer_radius: wedge.outer_radius,
                visible: wedge.visible,
                opacity: highlight.opacity(wedge.anum),
            })
            .collect();

        let geo = &layout.geometry;
        LayoutDump {
            depth: layout.depth,
            wrapper_width: geo.wrapper_width,
            width: geo.svg_width(),
            height: geo.svg_height(),
            radius: geo.radius,
            center: [geo.center.0, geo.center.1],
            container_height: highlight.container_height(),
            caption: session.caption().clone(),
            wedges,
        }
    }
}

pub fn write_layout_dump(path: Option<&Path>, session: &ChartSession) -> anyhow::Result<()> {
    let dump = LayoutDump::from_session(session);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&dump)?),
    }
    Ok(())
}
