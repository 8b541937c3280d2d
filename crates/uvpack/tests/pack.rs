//! End-to-end packing through every entry point, read back the way a host
//! would read it.

use glam::Vec2;
use uvpack::ffi::{XatlasAtlas, XatlasMesh, copy_uv};
use uvpack::{
    Atlas, Mesh, PackError, PackedUvBuffer, PackedUvs, PackedUvsMut, Vertex, pack, pack_to_vec,
    packed_size,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn scenario() -> (Atlas, Vec<Vertex>) {
    let atlas = Atlas::new(100, 200).unwrap();
    let vertices = vec![Vertex::new(5, [50.0, 100.0]), Vertex::new(7, [25.0, 50.0])];
    (atlas, vertices)
}

fn assert_scenario_output(view: &PackedUvs<'_>) {
    assert_eq!(view.vertex_count(), 2);
    assert_eq!(view.indices(), &[5, 7]);
    assert_eq!(view.uv_floats(), &[0.5, 0.5, 0.25, 0.25]);
    let pairs: Vec<_> = view.iter().collect();
    assert_eq!(pairs, vec![(5, Vec2::splat(0.5)), (7, Vec2::splat(0.25))]);
}

#[test]
fn owned_buffer() {
    init_tracing();
    let (atlas, vertices) = scenario();

    let buffer = pack_to_vec(&atlas, &Mesh::new(&vertices)).unwrap();

    assert_eq!(buffer.vertex_count(), 2);
    assert_scenario_output(&buffer.as_view());
}

#[test]
fn caller_allocated_bytes() {
    init_tracing();
    let (atlas, vertices) = scenario();
    let mesh = Mesh::new(&vertices);

    // The host queries the size first, then allocates. Words keep it aligned.
    let size = packed_size(mesh.vertex_count()).unwrap();
    assert_eq!(size, 24);
    let mut storage = vec![0u32; size / 4];
    let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut storage);

    let mut view = PackedUvsMut::from_bytes(bytes, mesh.vertex_count()).unwrap();
    assert_eq!(pack(&atlas, &mesh, &mut view), Ok(2));

    let bytes: &[u8] = bytemuck::cast_slice(&storage);
    assert_scenario_output(&PackedUvs::from_bytes(bytes, 2).unwrap());
}

#[test]
#[allow(unsafe_code)]
fn c_abi_entry_point() {
    init_tracing();
    let (_, mut vertices) = scenario();
    let atlas = XatlasAtlas {
        width: 100,
        height: 200,
        mesh_count: 1,
        ..XatlasAtlas::default()
    };
    let mesh = XatlasMesh {
        vertex_array: vertices.as_mut_ptr(),
        vertex_count: 2,
        ..XatlasMesh::default()
    };
    let mut output = vec![0u32; 6];

    let written = unsafe { copy_uv(&atlas, &mesh, output.as_mut_ptr().cast()) };

    assert_eq!(written, 2);
    assert_scenario_output(&PackedUvs::from_words(&output, 2).unwrap());
}

#[test]
fn undersized_caller_buffer_is_rejected_up_front() {
    init_tracing();
    let mut storage = vec![0u32; 5];
    let err = PackedUvsMut::from_bytes(bytemuck::cast_slice_mut(&mut storage), 2).unwrap_err();
    assert_eq!(
        err,
        PackError::BufferTooSmall {
            required: 24,
            actual: 20
        }
    );
    assert_eq!(err.to_string(), "output buffer too small: need 24 bytes, have 20");
}

#[test]
fn zero_sized_atlas_is_rejected_up_front() {
    init_tracing();
    let err = Atlas::new(0, 0).unwrap_err();
    assert_eq!(err.to_string(), "atlas dimensions must be non-zero, got 0x0");
}

#[test]
fn every_engine_mesh_packs_independently() {
    init_tracing();
    let atlas = Atlas::new(256, 256).unwrap().with_counts(0, 2, 2);
    let first = [Vertex::new(0, [0.0, 0.0]), Vertex::new(1, [256.0, 128.0])];
    let second = [Vertex::new(3, [64.0, 192.0])];

    let buffers: Vec<PackedUvBuffer> = [&first[..], &second[..]]
        .into_iter()
        .map(|vertices| pack_to_vec(&atlas, &Mesh::new(vertices)).unwrap())
        .collect();

    assert_eq!(buffers[0].indices(), &[0, 1]);
    assert_eq!(buffers[0].uvs(), &[[0.0, 0.0], [1.0, 0.5]]);
    assert_eq!(buffers[1].indices(), &[3]);
    assert_eq!(buffers[1].uvs(), &[[0.25, 0.75]]);
}

#[test]
fn zero_vertex_mesh() {
    init_tracing();
    let atlas = Atlas::new(16, 16).unwrap();
    let buffer = pack_to_vec(&atlas, &Mesh::default()).unwrap();
    assert_eq!(buffer.vertex_count(), 0);
    assert!(buffer.as_bytes().is_empty());
}
