//! Integration tests for voxel extraction and structured points output

use std::path::{Path, PathBuf};

use mictools_store::{Array, MemoryStore};
use mictools_voxels::vtk::{grid_to_vtk, write_vtk, VtkFormat};
use mictools_voxels::{
    AttributeType, CellDataSpec, Dimensionality, Error, FieldArray, GridValue, VoxelGrid,
    VoxelGridExtractor, VtkOptions, VtkWriter,
};
use rstest::{fixture, rstest};

const IDS: &str = "/CellData/FeatureIds";
const SERIES: &str = "/CellData/TimeSeries";

/// Fresh directory for the files of one test
fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mictools_voxels_{}_{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<String>>();
    names.sort();
    names
}

/// 2x2x1 grid with three snapshots stored as a group
#[fixture]
fn store() -> MemoryStore {
    MemoryStore::new()
        .with(IDS, Array::from_ints(vec![1, 1, 2, 2]))
        .unwrap()
        .with(&format!("{SERIES}/0"), Array::from_ints(vec![1, 1, 2, 2]))
        .unwrap()
        .with(&format!("{SERIES}/1"), Array::from_ints(vec![1, 2, 2, 2]))
        .unwrap()
        .with(&format!("{SERIES}/2"), Array::from_ints(vec![2, 2, 2, 2]))
        .unwrap()
}

fn extract(store: &MemoryStore, time_path: Option<&str>) -> mictools_voxels::Result<VoxelGrid> {
    VoxelGridExtractor::new(Dimensionality::Three).extract(
        store,
        IDS,
        &GridValue::Values(vec![2, 2, 1]),
        &GridValue::Values(vec![1.0, 1.0, 1.0]),
        time_path,
    )
}

#[rstest]
fn single_grid_document(store: MemoryStore) {
    let dir = output_dir("single");
    let path = dir.join("grains.vtk");

    let grid = extract(&store, None).unwrap();
    let written = VtkWriter::new(VtkOptions::default())
        .write(&grid, &path)
        .unwrap();

    assert_eq!(written, vec![path.clone()]);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "# vtk DataFile Version 2.0\n\
         t=? s\n\
         ASCII\n\
         DATASET STRUCTURED_POINTS\n\
         DIMENSIONS 3 3 2\n\
         SPACING 1 1 1\n\
         ORIGIN 0 0 0\n\
         CELL_DATA 4\n\
         SCALARS GrainID int\n\
         LOOKUP_TABLE default\n\
         1 1 2 2\n"
    );
}

#[rstest]
#[case(vec![2, 2, 2], 4)]
#[case(vec![3, 1, 1], 4)]
#[case(vec![1, 1, 1], 4)]
fn length_mismatch(store: MemoryStore, #[case] dims: Vec<i64>, #[case] found: usize) {
    let result = VoxelGridExtractor::new(Dimensionality::Three).extract(
        &store,
        IDS,
        &GridValue::Values(dims),
        &GridValue::Values(vec![1.0, 1.0, 1.0]),
        None,
    );
    assert!(matches!(result, Err(Error::ShapeMismatch { found: f, .. }) if f == found));
}

#[rstest]
#[case(vec![0, 2, 1])]
#[case(vec![2, -2, 1])]
fn non_positive_dimensions(store: MemoryStore, #[case] dims: Vec<i64>) {
    let result = VoxelGridExtractor::new(Dimensionality::Three).extract(
        &store,
        IDS,
        &GridValue::Values(dims),
        &GridValue::Values(vec![1.0, 1.0, 1.0]),
        None,
    );
    assert!(matches!(result, Err(Error::Dimensionality(_))));
}

#[rstest]
fn time_series_separate_files(store: MemoryStore) {
    let dir = output_dir("separate");
    let grid = extract(&store, Some(SERIES)).unwrap();
    assert_eq!(grid.timesteps.len(), 3);

    let written = VtkWriter::new(VtkOptions::default())
        .write(&grid, dir.join("grains.vtk"))
        .unwrap();

    assert_eq!(written.len(), 3);
    assert_eq!(
        files_in(&dir),
        vec!["grains_t0.vtk", "grains_t1.vtk", "grains_t2.vtk"]
    );

    let last = std::fs::read_to_string(dir.join("grains_t2.vtk")).unwrap();
    assert_eq!(last.matches("CELL_DATA").count(), 1);
    assert!(last.ends_with("LOOKUP_TABLE default\n2 2 2 2\n"));
}

#[rstest]
fn time_series_embedded(store: MemoryStore) {
    let dir = output_dir("embedded");
    let path = dir.join("grains.vtk");
    let grid = extract(&store, Some(SERIES)).unwrap();

    let options = VtkOptions::builder().embed_time(true).build();
    let written = VtkWriter::new(options).write(&grid, &path).unwrap();

    assert_eq!(written, vec![path.clone()]);
    assert_eq!(files_in(&dir), vec!["grains.vtk"]);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("CELL_DATA 4\n").count(), 3);
    for i in 0..3 {
        assert!(text.contains(&format!("SCALARS GrainID_{i} int\n")));
    }
}

#[rstest]
fn bad_snapshot_writes_nothing(store: MemoryStore) {
    let dir = output_dir("bad_snapshot");
    let store = store
        .with(&format!("{SERIES}/2"), Array::from_ints(vec![2, 2, 2]))
        .unwrap();

    let result = extract(&store, Some(SERIES)).and_then(|grid| {
        VtkWriter::new(VtkOptions::default()).write(&grid, dir.join("grains.vtk"))
    });

    assert!(files_in(&dir).is_empty());
    assert!(matches!(
        result,
        Err(Error::SnapshotMismatch {
            index: 2,
            expected: 4,
            found: 3
        })
    ));
}

#[rstest]
fn two_dimensional_grid() {
    let store = MemoryStore::new()
        .with(
            IDS,
            Array::from_ints(vec![1, 2, 3, 4, 5, 6])
                .reshape(vec![1, 2, 3, 1])
                .unwrap(),
        )
        .unwrap();

    let grid = VoxelGridExtractor::new(Dimensionality::Two)
        .extract(
            &store,
            IDS,
            &GridValue::Values(vec![3, 2]),
            &GridValue::Values(vec![0.25, 0.25, 99.0]),
            None,
        )
        .unwrap();

    assert_eq!(grid.dimensions, [3, 2, 1]);
    assert_eq!(grid.spacing, [0.25, 0.25, 0.25]);
    assert_eq!(grid.grain_at(2, 1, 0), Some(6));
}

#[rstest]
fn unwritable_destination(store: MemoryStore) {
    let grid = extract(&store, None).unwrap();
    let path = output_dir("unwritable").join("missing").join("grains.vtk");
    let result = VtkWriter::new(VtkOptions::default()).write(&grid, &path);
    assert!(matches!(result, Err(Error::IOWriteError { .. })));
}

#[rstest]
fn vtkio_export(store: MemoryStore) {
    let dir = output_dir("vtkio");
    let grid = extract(&store, None).unwrap();

    let written = write_vtk(
        grid_to_vtk(&grid, "GrainID").unwrap(),
        dir.join("grains.vtk"),
        VtkFormat::Xml,
    )
    .unwrap();

    assert_eq!(written, dir.join("grains.vti"));
    assert!(written.exists());
}

#[rstest]
fn extra_cell_data_in_every_snapshot(store: MemoryStore) {
    let dir = output_dir("cell_data");
    let store = store
        .with(
            "/CellData/Confidence",
            Array::from_floats(vec![0.5, 0.75, 1.0, 0.25]),
        )
        .unwrap()
        .with(
            "/CellData/Pairs",
            Array::from_ints(vec![1, 2, 3, 4, 5, 6, 7, 8])
                .reshape(vec![4, 2])
                .unwrap(),
        )
        .unwrap();

    let specs = vec![
        CellDataSpec {
            path: "CellData.Pairs".into(),
            name: "extra".into(),
            data_type: mictools_voxels::vtk::VtkDataType::UnsignedInt,
            attribute: AttributeType::Field,
            field_array: Some(FieldArray {
                name: "pairs".into(),
                components: 2,
            }),
            tag: None,
        },
        CellDataSpec {
            path: "/CellData/Confidence".into(),
            name: "Confidence".into(),
            data_type: mictools_voxels::vtk::VtkDataType::Float,
            attribute: AttributeType::Scalars,
            field_array: None,
            tag: None,
        },
    ];

    let grid = VoxelGridExtractor::new(Dimensionality::Three)
        .cell_data(specs)
        .extract(
            &store,
            IDS,
            &GridValue::Values(vec![2, 2, 1]),
            &GridValue::Values(vec![1.0, 1.0, 1.0]),
            Some(SERIES),
        )
        .unwrap();

    VtkWriter::new(VtkOptions::default())
        .write(&grid, dir.join("grains.vtk"))
        .unwrap();

    for i in 0..3 {
        let text = std::fs::read_to_string(dir.join(format!("grains_t{i}.vtk"))).unwrap();
        assert!(text.ends_with(
            "SCALARS Confidence float\n\
             LOOKUP_TABLE default\n\
             0.5 0.75 1 0.25\n\
             FIELD extra 1\n\
             pairs 2 4 unsigned_int\n\
             1 2 3 4 5 6 7 8\n"
        ));
    }
}

#[rstest]
fn short_cell_data_fails_extraction(store: MemoryStore) {
    let store = store
        .with("/CellData/Normals", Array::from_floats(vec![0.0; 6]))
        .unwrap();

    let result = VoxelGridExtractor::new(Dimensionality::Three)
        .cell_data(vec![CellDataSpec {
            path: "/CellData/Normals".into(),
            name: "Normals".into(),
            data_type: mictools_voxels::vtk::VtkDataType::Float,
            attribute: AttributeType::Normals,
            field_array: None,
            tag: None,
        }])
        .extract(
            &store,
            IDS,
            &GridValue::Values(vec![2, 2, 1]),
            &GridValue::Values(vec![1.0, 1.0, 1.0]),
            None,
        );

    assert!(matches!(
        result,
        Err(Error::CellDataMismatch {
            expected: 12,
            found: 6,
            ..
        })
    ));
}
