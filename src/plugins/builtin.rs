//! Catalog of the plugin packages shipped with the base install

use std::path::{Path, PathBuf};

use super::{InterfaceInfo, InterfaceType, PackageInfo, PluginCatalog, PluginInfo};

struct InterfaceRow {
    name: &'static str,
    interface_type: InterfaceType,
    families: &'static [&'static str],
    docstring: &'static str,
}

struct PluginRow {
    package: &'static str,
    interface: &'static str,
    family: &'static str,
    name: &'static str,
    source_names: &'static [&'static str],
    relative_path: &'static str,
}

const PACKAGES: &[(&str, &str)] = &[
    (
        "geoips",
        "Geolocated Information Processing System: base package providing the \
         interfaces, procflows and core plugins.",
    ),
    (
        "data_fusion",
        "Data fusion plugin package: combines multiple input sources into a single \
         fused product.",
    ),
];

const INTERFACES: &[InterfaceRow] = &[
    InterfaceRow {
        name: "algorithms",
        interface_type: InterfaceType::ModuleBased,
        families: &[
            "single_channel",
            "channel_combination",
            "list_numpy_to_numpy",
            "xarray_to_numpy",
            "xarray_dict_to_xarray",
            "xarray_dict_to_xarray_dict",
        ],
        docstring: "Algorithms convert input data arrays into derived product arrays.",
    },
    InterfaceRow {
        name: "colormappers",
        interface_type: InterfaceType::ModuleBased,
        families: &["matplotlib"],
        docstring: "Colormappers produce the matplotlib colormap information for a product.",
    },
    InterfaceRow {
        name: "filename_formatters",
        interface_type: InterfaceType::ModuleBased,
        families: &["standard", "xarray_metadata_to_filename"],
        docstring: "Filename formatters build output file names from product metadata.",
    },
    InterfaceRow {
        name: "interpolators",
        interface_type: InterfaceType::ModuleBased,
        families: &["2d", "grid"],
        docstring: "Interpolators resample swath or gridded data onto a target area.",
    },
    InterfaceRow {
        name: "output_formatters",
        interface_type: InterfaceType::ModuleBased,
        families: &["image", "unprojected", "xarray_data", "image_overlay"],
        docstring: "Output formatters write processed products to disk in a given format.",
    },
    InterfaceRow {
        name: "procflows",
        interface_type: InterfaceType::ModuleBased,
        families: &["standard"],
        docstring: "Procflows drive a complete processing workflow from input files to outputs.",
    },
    InterfaceRow {
        name: "readers",
        interface_type: InterfaceType::ModuleBased,
        families: &["standard"],
        docstring: "Readers load satellite data files into xarray datasets.",
    },
    InterfaceRow {
        name: "feature_annotators",
        interface_type: InterfaceType::YamlBased,
        families: &["cartopy"],
        docstring: "Feature annotators describe coastlines, borders and other map features.",
    },
    InterfaceRow {
        name: "gridline_annotators",
        interface_type: InterfaceType::YamlBased,
        families: &["cartopy"],
        docstring: "Gridline annotators describe latitude and longitude gridlines and labels.",
    },
    InterfaceRow {
        name: "products",
        interface_type: InterfaceType::YamlBased,
        families: &["list", "single_source", "data_fusion"],
        docstring: "Products tie together the algorithm, interpolator and colormapper used \
                    to produce an output for a given source.",
    },
    InterfaceRow {
        name: "sectors",
        interface_type: InterfaceType::YamlBased,
        families: &["area_definition_static", "generated"],
        docstring: "Sectors define the geographic region an output is produced for.",
    },
];

const PLUGINS: &[PluginRow] = &[
    PluginRow {
        package: "geoips",
        interface: "procflows",
        family: "standard",
        name: "single_source",
        source_names: &[],
        relative_path: "plugins/modules/procflows/single_source.py",
    },
    PluginRow {
        package: "geoips",
        interface: "procflows",
        family: "standard",
        name: "config_based",
        source_names: &[],
        relative_path: "plugins/modules/procflows/config_based.py",
    },
    PluginRow {
        package: "geoips",
        interface: "readers",
        family: "standard",
        name: "abi_netcdf",
        source_names: &["abi"],
        relative_path: "plugins/modules/readers/abi_netcdf.py",
    },
    PluginRow {
        package: "geoips",
        interface: "readers",
        family: "standard",
        name: "ahi_hsd",
        source_names: &["ahi"],
        relative_path: "plugins/modules/readers/ahi_hsd.py",
    },
    PluginRow {
        package: "geoips",
        interface: "algorithms",
        family: "single_channel",
        name: "single_channel",
        source_names: &[],
        relative_path: "plugins/modules/algorithms/single_channel.py",
    },
    PluginRow {
        package: "geoips",
        interface: "output_formatters",
        family: "image",
        name: "imagery_annotated",
        source_names: &[],
        relative_path: "plugins/modules/output_formatters/imagery_annotated.py",
    },
    PluginRow {
        package: "geoips",
        interface: "filename_formatters",
        family: "standard",
        name: "geoips_fname",
        source_names: &[],
        relative_path: "plugins/modules/filename_formatters/geoips_fname.py",
    },
    PluginRow {
        package: "geoips",
        interface: "products",
        family: "list",
        name: "abi",
        source_names: &["abi"],
        relative_path: "plugins/yaml/products/abi.yaml",
    },
    PluginRow {
        package: "geoips",
        interface: "sectors",
        family: "area_definition_static",
        name: "goes_east",
        source_names: &[],
        relative_path: "plugins/yaml/sectors/static/goes_east.yaml",
    },
    PluginRow {
        package: "data_fusion",
        interface: "procflows",
        family: "standard",
        name: "data_fusion",
        source_names: &[],
        relative_path: "plugins/modules/procflows/data_fusion.py",
    },
    PluginRow {
        package: "data_fusion",
        interface: "algorithms",
        family: "xarray_dict_to_xarray",
        name: "layered",
        source_names: &[],
        relative_path: "plugins/modules/algorithms/layered.py",
    },
    PluginRow {
        package: "data_fusion",
        interface: "products",
        family: "data_fusion",
        name: "fused_ir",
        source_names: &["abi", "ahi"],
        relative_path: "plugins/yaml/products/fused_ir.yaml",
    },
];

/// Catalog of the `geoips` and `data_fusion` packages under an install root
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    root: PathBuf,
}

impl BuiltinCatalog {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl PluginCatalog for BuiltinCatalog {
    fn packages(&self) -> Vec<PackageInfo> {
        PACKAGES
            .iter()
            .map(|(name, docstring)| PackageInfo {
                name: name.to_string(),
                docstring: docstring.to_string(),
                path: self.root.join(name),
            })
            .collect()
    }

    fn interfaces(&self) -> Vec<InterfaceInfo> {
        INTERFACES
            .iter()
            .map(|row| InterfaceInfo {
                package: "geoips".to_string(),
                name: row.name.to_string(),
                interface_type: row.interface_type,
                supported_families: row.families.iter().map(|f| f.to_string()).collect(),
                docstring: row.docstring.to_string(),
                absolute_path: self
                    .root
                    .join("geoips")
                    .join("interfaces")
                    .join(row.interface_type.as_str())
                    .join(format!("{}.py", row.name)),
            })
            .collect()
    }

    fn plugins(&self) -> Vec<PluginInfo> {
        PLUGINS
            .iter()
            .map(|row| PluginInfo {
                package: row.package.to_string(),
                interface: row.interface.to_string(),
                family: row.family.to_string(),
                name: row.name.to_string(),
                source_names: row.source_names.iter().map(|s| s.to_string()).collect(),
                relative_path: PathBuf::from(row.relative_path),
            })
            .collect()
    }
}
