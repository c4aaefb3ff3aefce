use super::{Export, FunctionKind, NamespaceInfo, NamespaceProvider, PixelContext};

fn pos(name: &'static str) -> Export {
    Export { name, arity: 0, kind: FunctionKind::Positional }
}
fn info(name: &'static str) -> Export {
    Export { name, arity: 0, kind: FunctionKind::Info }
}

/// Pixel-coordinate accessors. `x()`/`y()` are absolute; `col()`/`row()` count
/// from the domain origin. `width()`, `height()`, `xmin()` and `ymin()` are
/// constant for a run.
pub struct CoordsNamespace;

impl NamespaceInfo for CoordsNamespace {
    fn exports(&self) -> Vec<Export> {
        vec![
            pos("x"), pos("y"), pos("col"), pos("row"),
            info("width"), info("height"), info("xmin"), info("ymin"),
        ]
    }
}

impl NamespaceProvider for CoordsNamespace {
    fn call(&self, name: &str, _args: &[f64], ctx: &PixelContext) -> Option<f64> {
        let v = match name {
            "x"      => ctx.x as f64,
            "y"      => ctx.y as f64,
            "col"    => (ctx.x - ctx.bounds.x) as f64,
            "row"    => (ctx.y - ctx.bounds.y) as f64,
            "width"  => ctx.bounds.width as f64,
            "height" => ctx.bounds.height as f64,
            "xmin"   => ctx.bounds.x as f64,
            "ymin"   => ctx.bounds.y as f64,
            _ => return None,
        };
        Some(v)
    }
}
