mod graph_describe;
mod layer_linear;
mod layer_pool2d;
mod module_trait;
mod spectral_updates;
