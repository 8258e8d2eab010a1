/// Per-frame values shared by every pipeline.
const GLOBALS: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    ambient: vec4<f32>,
    // xyz position, w falloff distance
    light_position: array<vec4<f32>, 2>,
    light_color: array<vec4<f32>, 2>,
    // x tunnel length
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
"#;

/// Lit ground surfaces. One draw per surface with its own model uniform.
const ROAD_BODY: &str = r#"
struct Surface {
    model: mat4x4<f32>,
    color: vec4<f32>,
    emissive: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> surface: Surface;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = surface.model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize((surface.model * vec4<f32>(vertex.normal, 0.0)).xyz);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var light = globals.ambient.rgb;
    for (var i = 0u; i < 2u; i = i + 1u) {
        let to_light = globals.light_position[i].xyz - in.world_pos;
        let dist = length(to_light);
        let falloff = max(1.0 - dist / globals.light_position[i].w, 0.0);
        let diffuse = max(dot(in.world_normal, to_light / max(dist, 1e-4)), 0.0);
        light = light + globals.light_color[i].rgb * diffuse * falloff;
    }
    return vec4<f32>(surface.color.rgb * light + surface.emissive.rgb, 1.0);
}
"#;

/// Unlit instanced streaks, dimmed toward the far end of the tunnel.
const INSTANCED_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) offset: vec3<f32>,
    @location(3) scale: vec3<f32>,
    @location(4) color: vec3<f32>,
    @location(5) fade: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) progress: f32,
    @location(2) fade: f32,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let world_pos = vertex.position * instance.scale + instance.offset;
    var out: VertexOutput;
    out.clip_position = globals.view_proj * vec4<f32>(world_pos, 1.0);
    out.color = instance.color;
    out.progress = clamp(-world_pos.z / globals.params.x, 0.0, 1.0);
    out.fade = instance.fade;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var alpha = 1.0;
    if (in.fade > 0.0) {
        alpha = 1.0 - smoothstep(1.0 - in.fade, 1.0, in.progress);
    }
    return vec4<f32>(in.color * alpha, 1.0);
}
"#;

pub fn road_shader() -> String {
    format!("{GLOBALS}{ROAD_BODY}")
}

pub fn instanced_shader() -> String {
    format!("{GLOBALS}{INSTANCED_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_share_globals() {
        for source in [road_shader(), instanced_shader()] {
            assert!(source.contains("var<uniform> globals: Globals"));
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
        }
    }
}
