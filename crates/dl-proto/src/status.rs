// status.rs — Status taxonomy: status codes, suggestion codes, pipeline types.
//
// These enumerations are pure data. Consumers key on the numeric values, so
// every variant carries its wire number explicitly and codes serialize as
// integers. Deserialization also accepts the canonical SCREAMING_CASE name,
// which is what the JSON gateway of older clients sends.
//
// StatusCode bands:
//   0            OK
//   100–199      build (and docker-network init)
//   200–250      success
//   300–499      status check / container / node
//   500–599      unknown
//   600–699      sync
//   700–799      dev init
//   800–899      cancellation
//   900–999      init
//   1000+        deploy

use std::fmt;

/// Declares a closed wire enumeration with fixed numeric codes.
///
/// Generates `code()`, `name()`, `from_code()`, `from_name()`, `Display`,
/// and integer-based serde impls.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The numeric wire value.
            pub fn code(self) -> i32 {
                self as i32
            }

            /// The canonical wire name (e.g. `BUILD_SUCCESS`).
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i32(self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct WireVisitor;

                impl<'de> serde::de::Visitor<'de> for WireVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        write!(f, "a {} code or name", stringify!($name))
                    }

                    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<$name, E> {
                        i32::try_from(v)
                            .ok()
                            .and_then($name::from_code)
                            .ok_or_else(|| E::custom(format!("unknown {} {}", stringify!($name), v)))
                    }

                    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<$name, E> {
                        i32::try_from(v)
                            .ok()
                            .and_then($name::from_code)
                            .ok_or_else(|| E::custom(format!("unknown {} {}", stringify!($name), v)))
                    }

                    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<$name, E> {
                        $name::from_name(v)
                            .ok_or_else(|| E::custom(format!("unknown {} '{}'", stringify!($name), v)))
                    }
                }

                deserializer.deserialize_any(WireVisitor)
            }
        }
    };
}

wire_enum! {
    /// Outcome codes attached to state and to [`ActionableErr`](crate::ActionableErr).
    pub enum StatusCode {
        Ok = 0 => "OK",

        // Build
        BuildPushAccessDenied = 101 => "BUILD_PUSH_ACCESS_DENIED",
        BuildProjectNotFound = 102 => "BUILD_PROJECT_NOT_FOUND",
        BuildDockerDaemonNotRunning = 103 => "BUILD_DOCKER_DAEMON_NOT_RUNNING",
        BuildUserError = 104 => "BUILD_USER_ERROR",
        BuildDockerUnavailable = 105 => "BUILD_DOCKER_UNAVAILABLE",
        BuildDockerUnauthorized = 106 => "BUILD_DOCKER_UNAUTHORIZED",
        BuildDockerSystemErr = 107 => "BUILD_DOCKER_SYSTEM_ERR",
        BuildDockerNotModifiedErr = 108 => "BUILD_DOCKER_NOT_MODIFIED_ERR",
        BuildDockerNotImplementedErr = 109 => "BUILD_DOCKER_NOT_IMPLEMENTED_ERR",
        BuildDockerDataLossErr = 110 => "BUILD_DOCKER_DATA_LOSS_ERR",
        BuildDockerForbiddenErr = 111 => "BUILD_DOCKER_FORBIDDEN_ERR",
        BuildDockerConflictErr = 112 => "BUILD_DOCKER_CONFLICT_ERR",
        BuildDockerErrorNotFound = 113 => "BUILD_DOCKER_ERROR_NOT_FOUND",
        BuildDockerInvalidParamErr = 114 => "BUILD_DOCKER_INVALID_PARAM_ERR",
        BuildDockerfileNotFound = 115 => "BUILD_DOCKERFILE_NOT_FOUND",
        BuildDockerCacheFromPullErr = 116 => "BUILD_DOCKER_CACHE_FROM_PULL_ERR",
        BuildDockerGetDigestErr = 117 => "BUILD_DOCKER_GET_DIGEST_ERR",
        BuildRegistryGetDigestErr = 118 => "BUILD_REGISTRY_GET_DIGEST_ERR",
        BuildUnknownJibPluginType = 119 => "BUILD_UNKNOWN_JIB_PLUGIN_TYPE",
        BuildJibGradleDepErr = 120 => "BUILD_JIB_GRADLE_DEP_ERR",
        BuildJibMavenDepErr = 121 => "BUILD_JIB_MAVEN_DEP_ERR",
        InitDockerNetworkListingContainers = 122 => "INIT_DOCKER_NETWORK_LISTING_CONTAINERS",
        InitDockerNetworkInvalidContainerName = 123 => "INIT_DOCKER_NETWORK_INVALID_CONTAINER_NAME",
        InitDockerNetworkContainerDoesNotExist = 124 => "INIT_DOCKER_NETWORK_CONTAINER_DOES_NOT_EXIST",
        InitDockerNetworkInvalidMode = 125 => "INIT_DOCKER_NETWORK_INVALID_MODE",
        InitDockerNetworkParseErr = 126 => "INIT_DOCKER_NETWORK_PARSE_ERR",
        BuildDockerNoSpaceErr = 127 => "BUILD_DOCKER_NO_SPACE_ERR",
        BuildGcbCreateBuildErr = 128 => "BUILD_GCB_CREATE_BUILD_ERR",
        BuildGcbGetBuildIdErr = 129 => "BUILD_GCB_GET_BUILD_ID_ERR",
        BuildGcbGetBuildStatusErr = 130 => "BUILD_GCB_GET_BUILD_STATUS_ERR",
        BuildGcbGetBuildLogErr = 131 => "BUILD_GCB_GET_BUILD_LOG_ERR",
        BuildGcbCopyBuildLogErr = 132 => "BUILD_GCB_COPY_BUILD_LOG_ERR",
        BuildGcbGetBuiltImageErr = 133 => "BUILD_GCB_GET_BUILT_IMAGE_ERR",
        BuildGcbBuildFailed = 134 => "BUILD_GCB_BUILD_FAILED",
        BuildGcbBuildInternalErr = 135 => "BUILD_GCB_BUILD_INTERNAL_ERR",
        BuildGcbBuildTimeout = 136 => "BUILD_GCB_BUILD_TIMEOUT",
        BuildUnknownPlatformFlag = 146 => "BUILD_UNKNOWN_PLATFORM_FLAG",
        BuildCrossPlatformErr = 147 => "BUILD_CROSS_PLATFORM_ERR",
        BuildCrossPlatformNoRegistryErr = 148 => "BUILD_CROSS_PLATFORM_NO_REGISTRY_ERR",

        // Success
        StatuscheckSuccess = 200 => "STATUSCHECK_SUCCESS",
        BuildSuccess = 201 => "BUILD_SUCCESS",
        DeploySuccess = 202 => "DEPLOY_SUCCESS",
        TestSuccess = 203 => "TEST_SUCCESS",
        RenderSuccess = 204 => "RENDER_SUCCESS",

        // Status check: containers and pods
        StatuscheckImagePullErr = 300 => "STATUSCHECK_IMAGE_PULL_ERR",
        StatuscheckContainerCreating = 301 => "STATUSCHECK_CONTAINER_CREATING",
        StatuscheckRunContainerErr = 302 => "STATUSCHECK_RUN_CONTAINER_ERR",
        StatuscheckContainerTerminated = 303 => "STATUSCHECK_CONTAINER_TERMINATED",
        StatuscheckDeploymentRolloutPending = 304 => "STATUSCHECK_DEPLOYMENT_ROLLOUT_PENDING",
        StatuscheckStandalonePodsPending = 305 => "STATUSCHECK_STANDALONE_PODS_PENDING",
        StatuscheckContainerRestarting = 356 => "STATUSCHECK_CONTAINER_RESTARTING",
        StatuscheckUnhealthy = 357 => "STATUSCHECK_UNHEALTHY",
        StatuscheckContainerExecError = 358 => "STATUSCHECK_CONTAINER_EXEC_ERROR",

        // Status check: nodes and cluster
        StatuscheckNodeMemoryPressure = 400 => "STATUSCHECK_NODE_MEMORY_PRESSURE",
        StatuscheckNodeDiskPressure = 401 => "STATUSCHECK_NODE_DISK_PRESSURE",
        StatuscheckNodeNetworkUnavailable = 402 => "STATUSCHECK_NODE_NETWORK_UNAVAILABLE",
        StatuscheckNodePidPressure = 403 => "STATUSCHECK_NODE_PID_PRESSURE",
        StatuscheckNodeUnschedulable = 404 => "STATUSCHECK_NODE_UNSCHEDULABLE",
        StatuscheckNodeUnreachable = 405 => "STATUSCHECK_NODE_UNREACHABLE",
        StatuscheckNodeNotReady = 406 => "STATUSCHECK_NODE_NOT_READY",
        StatuscheckFailedScheduling = 407 => "STATUSCHECK_FAILED_SCHEDULING",
        StatuscheckKubectlConnectionErr = 409 => "STATUSCHECK_KUBECTL_CONNECTION_ERR",
        StatuscheckKubectlPidKilled = 410 => "STATUSCHECK_KUBECTL_PID_KILLED",
        StatuscheckKubectlClientFetchErr = 411 => "STATUSCHECK_KUBECTL_CLIENT_FETCH_ERR",
        StatuscheckDeploymentFetchErr = 412 => "STATUSCHECK_DEPLOYMENT_FETCH_ERR",
        StatuscheckPodInitializing = 451 => "STATUSCHECK_POD_INITIALIZING",

        // Unknown
        UnknownError = 500 => "UNKNOWN_ERROR",
        StatuscheckUnknown = 501 => "STATUSCHECK_UNKNOWN",
        StatuscheckUnknownUnschedulable = 502 => "STATUSCHECK_UNKNOWN_UNSCHEDULABLE",
        StatuscheckContainerWaitingUnknown = 503 => "STATUSCHECK_CONTAINER_WAITING_UNKNOWN",
        DeployUnknown = 504 => "DEPLOY_UNKNOWN",
        SyncUnknown = 505 => "SYNC_UNKNOWN",
        BuildUnknown = 506 => "BUILD_UNKNOWN",
        DevinitUnknown = 507 => "DEVINIT_UNKNOWN",
        CleanupUnknown = 508 => "CLEANUP_UNKNOWN",
        StatuscheckUnknownEvent = 509 => "STATUSCHECK_UNKNOWN_EVENT",
        InitUnknown = 510 => "INIT_UNKNOWN",
        BuildDockerUnknown = 511 => "BUILD_DOCKER_UNKNOWN",
        TestUnknown = 512 => "TEST_UNKNOWN",

        // Sync
        SyncInitError = 601 => "SYNC_INIT_ERROR",

        // Dev init
        DevinitRegisterBuildDeps = 701 => "DEVINIT_REGISTER_BUILD_DEPS",
        DevinitRegisterTestDeps = 702 => "DEVINIT_REGISTER_TEST_DEPS",
        DevinitRegisterDeployDeps = 703 => "DEVINIT_REGISTER_DEPLOY_DEPS",
        DevinitRegisterConfigDep = 704 => "DEVINIT_REGISTER_CONFIG_DEP",
        DevinitUnsupportedV1Manifest = 705 => "DEVINIT_UNSUPPORTED_V1_MANIFEST",
        DevinitRegisterRenderDeps = 706 => "DEVINIT_REGISTER_RENDER_DEPS",

        // Cancellation
        StatuscheckUserCancelled = 800 => "STATUSCHECK_USER_CANCELLED",
        StatuscheckDeadlineExceeded = 801 => "STATUSCHECK_DEADLINE_EXCEEDED",
        BuildCancelled = 802 => "BUILD_CANCELLED",
        DeployCancelled = 803 => "DEPLOY_CANCELLED",
        BuildDockerCancelled = 804 => "BUILD_DOCKER_CANCELLED",
        BuildDockerDeadline = 805 => "BUILD_DOCKER_DEADLINE",

        // Init
        InitCreateTaggerError = 901 => "INIT_CREATE_TAGGER_ERROR",
        InitMinikubePausedError = 902 => "INIT_MINIKUBE_PAUSED_ERROR",
        InitMinikubeNotRunningError = 903 => "INIT_MINIKUBE_NOT_RUNNING_ERROR",
        InitCreateBuilderError = 904 => "INIT_CREATE_BUILDER_ERROR",
        InitCreateDeployerError = 905 => "INIT_CREATE_DEPLOYER_ERROR",
        InitCreateTestDepError = 906 => "INIT_CREATE_TEST_DEP_ERROR",
        InitCacheError = 907 => "INIT_CACHE_ERROR",
        InitCreateWatchTriggerError = 908 => "INIT_CREATE_WATCH_TRIGGER_ERROR",
        InitCreateArtifactDepError = 909 => "INIT_CREATE_ARTIFACT_DEP_ERROR",

        // Deploy
        DeployClusterConnectionErr = 1001 => "DEPLOY_CLUSTER_CONNECTION_ERR",
        DeployDebugHelperRetrieveErr = 1002 => "DEPLOY_DEBUG_HELPER_RETRIEVE_ERR",
        DeployCleanupErr = 1003 => "DEPLOY_CLEANUP_ERR",
        DeployHelmApplyLabels = 1004 => "DEPLOY_HELM_APPLY_LABELS",
        DeployHelmUserErr = 1005 => "DEPLOY_HELM_USER_ERR",
        DeployNoMatchingBuild = 1006 => "DEPLOY_NO_MATCHING_BUILD",
        DeployHelmVersionErr = 1007 => "DEPLOY_HELM_VERSION_ERR",
        DeployHelmMinVersionErr = 1008 => "DEPLOY_HELM_MIN_VERSION_ERR",
        DeployKubectlOfflineModeErr = 1010 => "DEPLOY_KUBECTL_OFFLINE_MODE_ERR",
        DeployErrWaitingForDeletion = 1011 => "DEPLOY_ERR_WAITING_FOR_DELETION",
        DeployReadManifestErr = 1012 => "DEPLOY_READ_MANIFEST_ERR",
        DeployReadRemoteManifestErr = 1013 => "DEPLOY_READ_REMOTE_MANIFEST_ERR",
        DeployListManifestErr = 1014 => "DEPLOY_LIST_MANIFEST_ERR",
        DeployKubectlUserErr = 1015 => "DEPLOY_KUBECTL_USER_ERR",
        DeployKustomizeUserErr = 1016 => "DEPLOY_KUSTOMIZE_USER_ERR",
        DeployReplaceImageErr = 1017 => "DEPLOY_REPLACE_IMAGE_ERR",
        DeployTransformManifestErr = 1018 => "DEPLOY_TRANSFORM_MANIFEST_ERR",
        DeploySetLabelErr = 1019 => "DEPLOY_SET_LABEL_ERR",
        DeployManifestWriteErr = 1020 => "DEPLOY_MANIFEST_WRITE_ERR",
        DeployParseManifestImagesErr = 1021 => "DEPLOY_PARSE_MANIFEST_IMAGES_ERR",
        DeployHelmCreateNsNotAvailable = 1022 => "DEPLOY_HELM_CREATE_NS_NOT_AVAILABLE",
        DeployClusterInternalSystemErr = 1023 => "DEPLOY_CLUSTER_INTERNAL_SYSTEM_ERR",
        DeployKptSourceErr = 1024 => "DEPLOY_KPT_SOURCE_ERR",
        DeployKptApplyErr = 1025 => "DEPLOY_KPT_APPLY_ERR",
        DeployKubectlVersionErr = 1109 => "DEPLOY_KUBECTL_VERSION_ERR",
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::Ok
    }
}

/// The phase a [`StatusCode`] belongs to, derived from its numeric band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBand {
    Success,
    Build,
    StatusCheck,
    Unknown,
    Sync,
    DevInit,
    Cancelled,
    Init,
    Deploy,
}

impl StatusCode {
    pub fn band(self) -> StatusBand {
        match self.code() {
            0 | 200..=250 => StatusBand::Success,
            100..=199 => StatusBand::Build,
            300..=499 => StatusBand::StatusCheck,
            500..=599 => StatusBand::Unknown,
            600..=699 => StatusBand::Sync,
            700..=799 => StatusBand::DevInit,
            800..=899 => StatusBand::Cancelled,
            900..=999 => StatusBand::Init,
            _ => StatusBand::Deploy,
        }
    }

    pub fn is_success(self) -> bool {
        self.band() == StatusBand::Success
    }
}

wire_enum! {
    /// Remediation hints paired with an [`ActionableErr`](crate::ActionableErr).
    pub enum SuggestionCode {
        Nil = 0 => "NIL",

        // Build
        AddDefaultRepo = 100 => "ADD_DEFAULT_REPO",
        CheckDefaultRepo = 101 => "CHECK_DEFAULT_REPO",
        CheckDefaultRepoGlobalConfig = 102 => "CHECK_DEFAULT_REPO_GLOBAL_CONFIG",
        GcloudDockerAuthConfigure = 103 => "GCLOUD_DOCKER_AUTH_CONFIGURE",
        DockerAuthConfigure = 104 => "DOCKER_AUTH_CONFIGURE",
        CheckGcloudProject = 105 => "CHECK_GCLOUD_PROJECT",
        CheckDockerRunning = 106 => "CHECK_DOCKER_RUNNING",
        FixUserBuildErr = 107 => "FIX_USER_BUILD_ERR",
        DockerBuildRetry = 108 => "DOCKER_BUILD_RETRY",
        FixCacheFromArtifactConfig = 109 => "FIX_CACHE_FROM_ARTIFACT_CONFIG",
        FixConfigDockerfile = 110 => "FIX_DEVLOOP_CONFIG_DOCKERFILE",
        FixJibPluginConfiguration = 111 => "FIX_JIB_PLUGIN_CONFIGURATION",
        FixDockerNetworkContainerName = 112 => "FIX_DOCKER_NETWORK_CONTAINER_NAME",
        CheckDockerNetworkContainerRunning = 113 => "CHECK_DOCKER_NETWORK_CONTAINER_RUNNING",
        FixDockerNetworkModeWhenExtractingContainerName = 114 => "FIX_DOCKER_NETWORK_MODE_WHEN_EXTRACTING_CONTAINER_NAME",
        RunDockerPrune = 115 => "RUN_DOCKER_PRUNE",
        SetCleanupFlag = 116 => "SET_CLEANUP_FLAG",
        BuildFixUnknownPlatformFlag = 117 => "BUILD_FIX_UNKNOWN_PLATFORM_FLAG",
        BuildInstallPlatformEmulators = 118 => "BUILD_INSTALL_PLATFORM_EMULATORS",
        SetPushAndContainerRegistry = 119 => "SET_PUSH_AND_CONTAINER_REGISTRY",

        // Deploy
        CheckClusterConnection = 201 => "CHECK_CLUSTER_CONNECTION",
        CheckMinikubeStatus = 202 => "CHECK_MINIKUBE_STATUS",
        InstallHelm = 203 => "INSTALL_HELM",
        UpgradeHelm = 204 => "UPGRADE_HELM",
        FixConfigHelmArtifactOverrides = 205 => "FIX_DEVLOOP_CONFIG_HELM_ARTIFACT_OVERRIDES",
        UpgradeHelm32 = 206 => "UPGRADE_HELM32",
        FixConfigHelmCreateNamespace = 207 => "FIX_DEVLOOP_CONFIG_HELM_CREATE_NAMESPACE",
        InvalidKptManifests = 208 => "INVALID_KPT_MANIFESTS",
        AlignKptInventory = 209 => "ALIGN_KPT_INVENTORY",
        InstallKubectl = 220 => "INSTALL_KUBECTL",

        // Status check
        CheckContainerLogs = 301 => "CHECK_CONTAINER_LOGS",
        CheckReadinessProbe = 302 => "CHECK_READINESS_PROBE",
        CheckContainerImage = 303 => "CHECK_CONTAINER_IMAGE",

        // Node
        AddressNodeMemoryPressure = 400 => "ADDRESS_NODE_MEMORY_PRESSURE",
        AddressNodeDiskPressure = 401 => "ADDRESS_NODE_DISK_PRESSURE",
        AddressNodeNetworkUnavailable = 402 => "ADDRESS_NODE_NETWORK_UNAVAILABLE",
        AddressNodePidPressure = 403 => "ADDRESS_NODE_PID_PRESSURE",
        AddressNodeUnschedulable = 404 => "ADDRESS_NODE_UNSCHEDULABLE",
        AddressNodeUnreachable = 405 => "ADDRESS_NODE_UNREACHABLE",
        AddressNodeNotReady = 406 => "ADDRESS_NODE_NOT_READY",
        AddressFailedScheduling = 407 => "ADDRESS_FAILED_SCHEDULING",
        CheckHostConnection = 408 => "CHECK_HOST_CONNECTION",

        // Cluster
        StartMinikube = 501 => "START_MINIKUBE",
        UnpauseMinikube = 502 => "UNPAUSE_MINIKUBE",
        RunDockerPull = 551 => "RUN_DOCKER_PULL",

        // Render
        SetRenderFlagOfflineFalse = 600 => "SET_RENDER_FLAG_OFFLINE_FALSE",

        // Config
        ConfigCheckFilePath = 700 => "CONFIG_CHECK_FILE_PATH",
        ConfigCheckDependencyDefinition = 701 => "CONFIG_CHECK_DEPENDENCY_DEFINITION",
        ConfigChangeNames = 702 => "CONFIG_CHANGE_NAMES",
        ConfigCheckFilter = 703 => "CONFIG_CHECK_FILTER",
        ConfigCheckProfileDefinition = 704 => "CONFIG_CHECK_PROFILE_DEFINITION",
        ConfigCheckDependencyProfilesSelection = 705 => "CONFIG_CHECK_DEPENDENCY_PROFILES_SELECTION",
        ConfigCheckProfileSelection = 706 => "CONFIG_CHECK_PROFILE_SELECTION",
        ConfigFixApiVersion = 707 => "CONFIG_FIX_API_VERSION",

        // Inspect
        InspectUseModifyOrNewProfile = 800 => "INSPECT_USE_MODIFY_OR_NEW_PROFILE",
        InspectUseAddBuildEnv = 801 => "INSPECT_USE_ADD_BUILD_ENV",
        InspectUseNewBuildEnv = 802 => "INSPECT_USE_NEW_BUILD_ENV",
        InspectBuildEnvAlreadyExistsErr = 803 => "INSPECT_BUILD_ENV_ALREADY_EXISTS_ERR",
        InspectBuildEnvIncorrectTypeErr = 804 => "INSPECT_BUILD_ENV_INCORRECT_TYPE_ERR",
        InspectProfileNotFoundErr = 805 => "INSPECT_PROFILE_NOT_FOUND_ERR",

        OpenIssue = 900 => "OPEN_ISSUE",
    }
}

impl Default for SuggestionCode {
    fn default() -> Self {
        SuggestionCode::Nil
    }
}

wire_enum! {
    /// Image builders named in session metadata.
    pub enum BuilderType {
        UnknownBuilderType = 0 => "UNKNOWN_BUILDER_TYPE",
        Jib = 1 => "JIB",
        Bazel = 2 => "BAZEL",
        Buildpacks = 3 => "BUILDPACKS",
        Custom = 4 => "CUSTOM",
        Kaniko = 5 => "KANIKO",
        Docker = 6 => "DOCKER",
        Ko = 7 => "KO",
    }
}

wire_enum! {
    /// Deployers named in session metadata.
    pub enum DeployerType {
        UnknownDeployerType = 0 => "UNKNOWN_DEPLOYER_TYPE",
        Helm = 1 => "HELM",
        Kustomize = 2 => "KUSTOMIZE",
        Kubectl = 3 => "KUBECTL",
        Kpt = 4 => "KPT",
    }
}

wire_enum! {
    /// Where deployments land.
    pub enum ClusterType {
        UnknownClusterType = 0 => "UNKNOWN_CLUSTER_TYPE",
        Minikube = 1 => "MINIKUBE",
        Gke = 2 => "GKE",
        Other = 3 => "OTHER",
    }
}

wire_enum! {
    /// Where builds run.
    pub enum BuildType {
        UnknownBuildType = 0 => "UNKNOWN_BUILD_TYPE",
        Cluster = 1 => "CLUSTER",
        Gcb = 2 => "GCB",
        Local = 3 => "LOCAL",
    }
}

impl Default for BuilderType {
    fn default() -> Self {
        BuilderType::UnknownBuilderType
    }
}

impl Default for DeployerType {
    fn default() -> Self {
        DeployerType::UnknownDeployerType
    }
}

impl Default for ClusterType {
    fn default() -> Self {
        ClusterType::UnknownClusterType
    }
}

impl Default for BuildType {
    fn default() -> Self {
        BuildType::UnknownBuildType
    }
}
