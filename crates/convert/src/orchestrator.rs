//! Run every requested conversion and collect the outcomes

// standard library
use std::path::{Path, PathBuf};

// crate modules
use crate::config::ConversionConfig;
use crate::driving::{write_driving, DrivingContext};
use crate::error::{Error, Result};
use crate::report::{Artifact, ConversionReport, Outcome};

// mictools modules
use mictools_format::f;
use mictools_grains::{write_txt, Grain, GrainTableExtractor};
use mictools_store::{open_store, Resolve};
use mictools_voxels::{VoxelGrid, VoxelGridExtractor, VtkWriter};

// external crates
use log::{error, info, warn};

/// Produce every output requested by `config`
///
/// The input is opened once. Everything needed is extracted from it, and it is
/// released before the first output is written. Artifacts succeed or fail independently, and nothing
/// is propagated: all failures end up in the returned [ConversionReport]. If
/// the input cannot be opened, every requested artifact fails with that
/// error.
///
/// The driving file is written last and may only reference outputs that were
/// written successfully in the same run.
pub fn run(config: &ConversionConfig) -> ConversionReport {
    let mut report = ConversionReport::new();

    let requested = config.output.requested();
    if requested.is_empty() {
        warn!("No outputs requested, nothing to do");
        return report;
    }

    info!("Opening {:?}", config.input);
    let store = match open_store(&config.input) {
        Ok(store) => store,
        Err(e) => {
            let e = Error::from(e);
            for artifact in requested {
                fail(&mut report, artifact, &e);
            }
            return report;
        }
    };

    let table = config.output.txt.is_some().then(|| grain_table(&*store, config));
    let needs_grid = config.output.vtk.is_some() || config.output.driving.is_some();
    let grid = needs_grid.then(|| voxel_grid(&*store, config));
    drop(store);

    if let (Some(path), Some(table)) = (&config.output.txt, table) {
        let result = table.and_then(|table| {
            write_txt(&table, path, &config.txt)?;
            Ok(vec![path.clone()])
        });
        record(&mut report, Artifact::Txt, result);
    }

    if let Some(path) = &config.output.vtk {
        match &grid {
            Some(Ok(grid)) => {
                let result = VtkWriter::new(config.vtk.clone())
                    .write(grid, path)
                    .map_err(Error::from);
                record(&mut report, Artifact::Vtk, result);
            }
            Some(Err(e)) => fail(&mut report, Artifact::Vtk, e),
            None => {}
        }
    }

    if let Some(path) = &config.output.driving {
        match &grid {
            Some(Ok(grid)) => {
                let result = driving_file(config, grid, &report, path).map(|p| vec![p]);
                record(&mut report, Artifact::Driving, result);
            }
            Some(Err(e)) => fail(&mut report, Artifact::Driving, e),
            None => {}
        }
    }

    report
}

/// Extract the grain table
fn grain_table(store: &dyn Resolve, config: &ConversionConfig) -> Result<Vec<Grain>> {
    let grains = config.grains_config()?;

    Ok(GrainTableExtractor::new()
        .include_background(grains.include_background)
        .rotation(grains.rotation)
        .unit(grains.unit)
        .extract(store, &grains.phases, &grains.euler_angles)?)
}

/// Extract the voxel grid, including any time series and extra cell data
fn voxel_grid(store: &dyn Resolve, config: &ConversionConfig) -> Result<VoxelGrid> {
    let grid = config.grid_config()?;

    Ok(VoxelGridExtractor::new(config.dim)
        .origin(grid.origin.clone())
        .time(grid.time.clone())
        .cell_data(grid.cell_data.clone())
        .extract(
            store,
            &grid.grain_ids,
            &grid.dimensions,
            &grid.spacing,
            grid.time_series.as_deref(),
        )?)
}

/// Fill the driving file template from the grid and the written outputs
fn driving_file(
    config: &ConversionConfig,
    grid: &VoxelGrid,
    report: &ConversionReport,
    destination: &Path,
) -> Result<PathBuf> {
    let template = config.driving_template()?;

    let grain_properties = written(report, Artifact::Txt)?.and_then(|paths| paths.first().cloned());

    // embedded series have no plain field, so point at the first snapshot
    let field = &config.vtk.field_name;
    let field = if grid.is_time_series() && config.vtk.embed_time {
        f!("{field}_0")
    } else {
        field.clone()
    };
    let grain_structure = written(report, Artifact::Vtk)?
        .and_then(|paths| paths.first().cloned())
        .map(|path| (path, field));

    let cell_data = config
        .grid_config()?
        .cell_data
        .iter()
        .filter_map(|spec| spec.tag.clone().map(|tag| (tag, spec.reference())))
        .collect();

    let context = DrivingContext::new(grid, config.dim)
        .grain_properties(grain_properties)
        .grain_structure(grain_structure)
        .cell_data(cell_data)
        .tags(config.driving.tags.clone())
        .absolute_paths(config.driving.absolute_paths);

    write_driving(template, destination, &context)
}

/// Paths of an artifact if it was requested, an error if it failed
fn written(report: &ConversionReport, artifact: Artifact) -> Result<Option<&Vec<PathBuf>>> {
    match report.outcome(artifact) {
        None => Ok(None),
        Some(Outcome::Written(paths)) => Ok(Some(paths)),
        Some(Outcome::Failed { .. }) => Err(Error::TemplateError(f!(
            "the {artifact} output it refers to was not written"
        ))),
    }
}

fn record(report: &mut ConversionReport, artifact: Artifact, result: Result<Vec<PathBuf>>) {
    match result {
        Ok(paths) => report.push(artifact, Outcome::Written(paths)),
        Err(e) => fail(report, artifact, &e),
    }
}

fn fail(report: &mut ConversionReport, artifact: Artifact, error: &Error) {
    error!("{artifact} failed: {}", error.chain());
    report.push(artifact, Outcome::failed(error));
}
